use crate::error::PlantMapError;

/// Result of a single resource fetch decided by a controller operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// No layer needed the resource, nothing was requested.
    NotRequested,
    /// Data fetched earlier for the current bounds was reused.
    Cached,
    /// Data was fetched and stored.
    Applied {
        /// Number of received records.
        count: usize,
    },
    /// A newer request for the same resource was issued before this one completed. Its result,
    /// if any, was discarded.
    Superseded,
    /// The request failed. Previously fetched data and the layers built from it are kept.
    Failed(PlantMapError),
}

impl FetchOutcome {
    /// Returns true if new data was stored.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Returns the error if the fetch failed.
    pub fn error(&self) -> Option<&PlantMapError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What a controller operation did with each remote resource.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Weather station fetch.
    pub stations: FetchOutcome,
    /// Power plant fetch.
    pub plants: FetchOutcome,
}

impl Default for SyncReport {
    fn default() -> Self {
        Self {
            stations: FetchOutcome::NotRequested,
            plants: FetchOutcome::NotRequested,
        }
    }
}

impl SyncReport {
    /// Returns true if any fetch failed.
    pub fn has_failures(&self) -> bool {
        self.stations.error().is_some() || self.plants.error().is_some()
    }

    /// Returns true if the operation sent no request to the services, i.e. every resource was
    /// either not needed or served from the cache.
    pub fn is_network_free(&self) -> bool {
        matches!(
            (&self.stations, &self.plants),
            (
                FetchOutcome::NotRequested | FetchOutcome::Cached,
                FetchOutcome::NotRequested | FetchOutcome::Cached
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_free_reports() {
        assert!(SyncReport::default().is_network_free());
        assert!(SyncReport {
            stations: FetchOutcome::NotRequested,
            plants: FetchOutcome::Cached,
        }
        .is_network_free());
        assert!(!SyncReport {
            stations: FetchOutcome::Applied { count: 0 },
            plants: FetchOutcome::Cached,
        }
        .is_network_free());
        assert!(!SyncReport {
            stations: FetchOutcome::NotRequested,
            plants: FetchOutcome::Failed(PlantMapError::Generic("boom".into())),
        }
        .is_network_free());
    }
}
