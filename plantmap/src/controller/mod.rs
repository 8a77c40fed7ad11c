//! [`LayerSyncController`] keeps the station, plant marker and heatmap layers consistent with the
//! current viewport, the technology filter and layer visibility.

use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;
use plantmap_types::{LatLon, ViewportBounds};
use tokio::task::JoinHandle;
use web_time::Instant;

use crate::config::SyncConfig;
use crate::data_provider::DataSource;
use crate::error::PlantMapError;
use crate::filter::FilterSet;
use crate::layer::{LayerKind, LayerVisibility, MapLayers};
use crate::messenger::Messenger;
use crate::model::{Plant, Station};

mod builder;
mod report;
mod request;

pub use builder::ControllerBuilder;
pub use report::{FetchOutcome, SyncReport};
use request::RequestTracker;

/// Synchronizes the three data layers of the map with the remote services.
///
/// The hosting UI calls the `on_*` methods from its event handlers: when the map view settles,
/// when the user applies a technology filter, when a layer toggle button is pressed and when the
/// map is clicked. None of these methods fail: fetch errors are logged and reported in the
/// returned [`SyncReport`], while the layers keep their last successfully fetched contents.
///
/// Layer contents are always derived from the cached data, the filter and visibility flags only
/// (see [`MapLayers::render`]). Fetched data is cached together with the bounds it was requested
/// for, so showing a layer again without moving the map does not hit the network.
///
/// Every fetch gets a request id. When a newer fetch of the same resource is issued, the older
/// one is cancelled, and a response that arrives for a request that is no longer the latest is
/// never applied.
///
/// The controller is cheap to clone; clones share the same state.
pub struct LayerSyncController<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for LayerSyncController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct Inner<S> {
    source: S,
    config: SyncConfig,
    messenger: Option<Arc<dyn Messenger>>,
    state: RwLock<SyncState>,
    station_requests: RequestTracker,
    plant_requests: RequestTracker,
}

struct SyncState {
    bounds: Option<ViewportBounds>,
    filter: FilterSet,
    visibility: LayerVisibility,
    stations: Cached<Station>,
    plants: Cached<Plant>,
    layers: MapLayers,
}

/// Last successfully fetched records and the bounds they were requested for.
struct Cached<T> {
    items: Vec<T>,
    bounds: Option<ViewportBounds>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self {
            items: vec![],
            bounds: None,
        }
    }
}

impl<T> Cached<T> {
    fn is_valid_for(&self, bounds: &ViewportBounds) -> bool {
        self.bounds.as_ref() == Some(bounds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resource {
    Stations,
    Plants,
}

impl Resource {
    fn of(layer: LayerKind) -> Self {
        match layer {
            LayerKind::Stations => Self::Stations,
            LayerKind::PlantMarkers | LayerKind::Heatmap => Self::Plants,
        }
    }
}

/// How a toggled layer gets its data.
enum Plan {
    Cached,
    Join(u64),
    Fetch(u64),
}

impl<S: DataSource> LayerSyncController<S> {
    /// Creates a builder for a controller loading data from `source`.
    pub fn builder(source: S) -> ControllerBuilder<S> {
        ControllerBuilder::new(source)
    }

    /// Current viewport bounds, if the map has reported any.
    pub fn bounds(&self) -> Option<ViewportBounds> {
        self.inner.state.read().bounds
    }

    /// Active technology filter.
    pub fn filter(&self) -> FilterSet {
        self.inner.state.read().filter.clone()
    }

    /// Current layer visibility.
    pub fn visibility(&self) -> LayerVisibility {
        self.inner.state.read().visibility
    }

    /// Snapshot of the rendered layers.
    pub fn layers(&self) -> MapLayers {
        self.inner.state.read().layers.clone()
    }

    /// Last successfully fetched stations.
    pub fn stations(&self) -> Vec<Station> {
        self.inner.state.read().stations.items.clone()
    }

    /// Last successfully fetched plants.
    pub fn plants(&self) -> Vec<Plant> {
        self.inner.state.read().plants.items.clone()
    }

    /// Stores the new bounds and fetches data for every visible layer. Hidden layers are not
    /// updated. Station and plant requests run concurrently.
    pub async fn on_viewport_settled(&self, bounds: ViewportBounds) -> SyncReport {
        let (station_request, plant_request) = {
            let mut state = self.inner.state.write();
            state.bounds = Some(bounds);
            (
                state
                    .visibility
                    .stations
                    .then(|| self.inner.station_requests.issue(bounds)),
                state
                    .visibility
                    .needs_plants()
                    .then(|| self.inner.plant_requests.issue(bounds)),
            )
        };

        log::debug!("Viewport settled at {bounds:?}");
        self.sync(bounds, station_request, plant_request).await
    }

    /// Repeats the fetch for the stored bounds. Used for the initial load when the controller was
    /// built with bounds. Does nothing if no bounds are known.
    pub async fn refresh(&self) -> SyncReport {
        match self.bounds() {
            Some(bounds) => self.on_viewport_settled(bounds).await,
            None => SyncReport::default(),
        }
    }

    /// Replaces the technology filter and re-renders the plant layers from the cached plants.
    /// No requests are made.
    pub fn on_filter_changed(&self, filter: FilterSet) -> Vec<LayerKind> {
        log::debug!("Technology filter changed to {filter:?}");
        self.inner.state.write().filter = filter;
        self.render()
    }

    /// Flips visibility of the layer.
    ///
    /// A layer that becomes visible is rendered from the cache if its data was fetched for the
    /// current bounds. If a request for the current bounds is already running, its result is
    /// awaited instead of sending another one. Otherwise the data is fetched. A layer that becomes
    /// hidden is cleared, but its cached data is kept.
    pub async fn on_visibility_toggled(&self, layer: LayerKind) -> SyncReport {
        let request = {
            let mut state = self.inner.state.write();
            let visible = state.visibility.toggle(layer);
            log::debug!("Layer {layer:?} visibility set to {visible}");

            match (visible, state.bounds) {
                (true, Some(bounds)) => {
                    let resource = Resource::of(layer);
                    let cached = match resource {
                        Resource::Stations => state.stations.is_valid_for(&bounds),
                        Resource::Plants => state.plants.is_valid_for(&bounds),
                    };

                    let tracker = self.tracker(resource);
                    let plan = if cached {
                        Plan::Cached
                    } else if let Some(id) = tracker.pending_for(&bounds) {
                        Plan::Join(id)
                    } else {
                        Plan::Fetch(tracker.issue(bounds))
                    };
                    Some((resource, bounds, plan))
                }
                _ => None,
            }
        };

        match request {
            None => {
                self.render();
                SyncReport::default()
            }
            Some((resource, bounds, plan)) => {
                let outcome = match plan {
                    Plan::Cached => FetchOutcome::Cached,
                    Plan::Join(id) => {
                        log::debug!("Waiting for running {resource:?} request {id}");
                        self.tracker(resource).outcome_of(id).await
                    }
                    Plan::Fetch(id) => match resource {
                        Resource::Stations => self.load_stations(bounds, id).await,
                        Resource::Plants => self.load_plants(bounds, id).await,
                    },
                };
                self.render();

                let mut report = SyncReport::default();
                match resource {
                    Resource::Stations => report.stations = outcome,
                    Resource::Plants => report.plants = outcome,
                }
                report
            }
        }
    }

    /// Sends the click position to the telemetry endpoint. Failures are only logged.
    pub async fn on_map_clicked(&self, position: LatLon) {
        let timeout = self.inner.config.request_timeout;
        let result =
            match tokio::time::timeout(timeout, self.inner.source.record_click(position)).await {
                Ok(result) => result,
                Err(_) => Err(PlantMapError::Timeout(timeout)),
            };

        match result {
            Ok(()) => log::debug!("Click at {position:?} recorded"),
            Err(err) => log::warn!("Failed to record click at {position:?}: {err}"),
        }
    }

    /// Recomputes all layers from the cached data, the filter and visibility. Returns the layers
    /// whose contents changed and notifies the messenger about each of them.
    ///
    /// Calling this method again without any state change returns an empty list.
    pub fn render(&self) -> Vec<LayerKind> {
        let changed = {
            let mut state = self.inner.state.write();
            let layers = MapLayers::render(
                &state.stations.items,
                &state.plants.items,
                &state.filter,
                state.visibility,
            );
            let changed = state.layers.changed_layers(&layers);
            state.layers = layers;
            changed
        };

        if let Some(messenger) = &self.inner.messenger {
            for layer in &changed {
                messenger.layer_changed(*layer);
            }
        }

        changed
    }

    async fn sync(
        &self,
        bounds: ViewportBounds,
        station_request: Option<u64>,
        plant_request: Option<u64>,
    ) -> SyncReport {
        let stations = async {
            match station_request {
                Some(id) => self.load_stations(bounds, id).await,
                None => FetchOutcome::NotRequested,
            }
        };
        let plants = async {
            match plant_request {
                Some(id) => self.load_plants(bounds, id).await,
                None => FetchOutcome::NotRequested,
            }
        };

        let (stations, plants) = tokio::join!(stations, plants);
        self.render();

        SyncReport { stations, plants }
    }

    async fn load_stations(&self, bounds: ViewportBounds, id: u64) -> FetchOutcome {
        let source = &self.inner.source;
        let result = self
            .guarded(Resource::Stations, id, || source.fetch_stations(&bounds))
            .await;

        self.apply(Resource::Stations, id, result, |state, stations| {
            state.stations = Cached {
                items: stations,
                bounds: Some(bounds),
            };
        })
    }

    async fn load_plants(&self, bounds: ViewportBounds, id: u64) -> FetchOutcome {
        let source = &self.inner.source;
        let result = self
            .guarded(Resource::Plants, id, || source.fetch_plants(&bounds))
            .await;

        self.apply(Resource::Plants, id, result, |state, plants| {
            state.plants = Cached {
                items: plants,
                bounds: Some(bounds),
            };
        })
    }

    fn apply<T>(
        &self,
        resource: Resource,
        id: u64,
        result: Option<Result<Vec<T>, PlantMapError>>,
        store: impl FnOnce(&mut SyncState, Vec<T>),
    ) -> FetchOutcome {
        let tracker = self.tracker(resource);
        let outcome = match result {
            None => {
                log::debug!("{resource:?} request {id} was superseded");
                FetchOutcome::Superseded
            }
            Some(Err(err)) => {
                log::warn!("Failed to load {resource:?}: {err}");
                FetchOutcome::Failed(err)
            }
            Some(Ok(items)) => {
                let mut state = self.inner.state.write();
                if tracker.is_latest(id) {
                    let count = items.len();
                    store(&mut *state, items);
                    log::info!("Loaded {count} {resource:?} records");
                    FetchOutcome::Applied { count }
                } else {
                    log::debug!("Discarding stale {resource:?} response {id}");
                    FetchOutcome::Superseded
                }
            }
        };

        tracker.finish(id, &outcome);
        outcome
    }

    /// Runs the request with timeout and retries. Returns `None` if a newer request for the same
    /// resource was issued before this one completed.
    async fn guarded<T, F, Fut>(
        &self,
        resource: Resource,
        id: u64,
        load: F,
    ) -> Option<Result<T, PlantMapError>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PlantMapError>>,
    {
        let tracker = self.tracker(resource);
        if !tracker.is_latest(id) {
            return None;
        }

        tokio::select! {
            result = self.load_with_retry(resource, load) => Some(result),
            _ = tracker.superseded(id) => None,
        }
    }

    async fn load_with_retry<T, F, Fut>(
        &self,
        resource: Resource,
        mut load: F,
    ) -> Result<T, PlantMapError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PlantMapError>>,
    {
        let config = self.inner.config;
        let mut attempt = 0;
        loop {
            let started = Instant::now();
            let result = match tokio::time::timeout(config.request_timeout, load()).await {
                Ok(result) => result,
                Err(_) => Err(PlantMapError::Timeout(config.request_timeout)),
            };
            log::debug!(
                "{resource:?} request attempt {} finished in {:?}",
                attempt + 1,
                started.elapsed()
            );

            match result {
                Err(err) if err.is_retryable() && attempt < config.max_retries => {
                    attempt += 1;
                    let delay = config.retry_delay(attempt);
                    log::debug!("Retrying {resource:?} request in {delay:?} after error: {err}");
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    fn tracker(&self, resource: Resource) -> &RequestTracker {
        match resource {
            Resource::Stations => &self.inner.station_requests,
            Resource::Plants => &self.inner.plant_requests,
        }
    }
}

impl<S: DataSource + 'static> LayerSyncController<S> {
    /// Runs [`on_viewport_settled`](Self::on_viewport_settled) as a background task. For event
    /// handlers that cannot await.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn_viewport_settled(&self, bounds: ViewportBounds) -> JoinHandle<SyncReport> {
        let controller = self.clone();
        crate::async_runtime::spawn(async move { controller.on_viewport_settled(bounds).await })
    }

    /// Runs [`on_map_clicked`](Self::on_map_clicked) as a background task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn spawn_map_clicked(&self, position: LatLon) -> JoinHandle<()> {
        let controller = self.clone();
        crate::async_runtime::spawn(async move { controller.on_map_clicked(position).await })
    }
}
