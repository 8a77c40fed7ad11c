//! Error types used by the crate.

use std::time::Duration;

use plantmap_types::TypesError;
use thiserror::Error;

/// Plantmap error type.
///
/// The error is `Clone` so that the outcome of a failed fetch can be both logged and reported to
/// the caller in a [`SyncReport`](crate::controller::SyncReport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlantMapError {
    /// The service could not be reached (offline, connection refused, broken transfer).
    #[error("failed to load {url}: {message}")]
    Network {
        /// Requested url.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("{url} responded with status {status}{}", detail_suffix(.detail))]
    Status {
        /// Requested url.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, if the body carried one.
        detail: Option<String>,
    },
    /// The payload is empty or is not valid JSON of the expected shape.
    #[error("failed to decode payload: {0}")]
    Decoding(String),
    /// The service answered with success status, but with an error object as the body.
    #[error("service error: {0}")]
    Service(String),
    /// The request did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Viewport bounds are not valid.
    #[error("invalid bounds")]
    InvalidBounds(#[from] TypesError),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}

impl PlantMapError {
    /// Returns true if repeating the same request has a chance to succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

impl From<serde_json::Error> for PlantMapError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decoding(value.to_string())
    }
}
