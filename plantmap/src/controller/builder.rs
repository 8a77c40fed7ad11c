use std::sync::Arc;

use parking_lot::RwLock;
use plantmap_types::ViewportBounds;

use super::request::RequestTracker;
use super::{Cached, Inner, LayerSyncController, SyncState};
use crate::config::{ServiceConfig, SyncConfig};
use crate::data_provider::{DataSource, HttpDataSource};
use crate::error::PlantMapError;
use crate::filter::FilterSet;
use crate::layer::{LayerVisibility, MapLayers};
use crate::messenger::Messenger;

/// Constructor for a [`LayerSyncController`].
///
/// ```no_run
/// use plantmap::config::ServiceConfig;
/// use plantmap::controller::ControllerBuilder;
/// use plantmap::plantmap_types::ViewportBounds;
///
/// # tokio_test::block_on(async {
/// let (sender, _receiver) = tokio::sync::mpsc::unbounded_channel();
/// let controller = ControllerBuilder::http(ServiceConfig::default())?
///     .with_bounds(ViewportBounds::from_coords(37.6, -122.6, 37.9, -122.2)?)
///     .with_messenger(sender)
///     .build();
///
/// let report = controller.refresh().await;
/// # Ok::<(), plantmap::error::PlantMapError>(())
/// # });
/// ```
pub struct ControllerBuilder<S> {
    source: S,
    config: SyncConfig,
    messenger: Option<Arc<dyn Messenger>>,
    bounds: Option<ViewportBounds>,
    filter: FilterSet,
    visibility: LayerVisibility,
}

impl ControllerBuilder<HttpDataSource> {
    /// Initializes a builder for a controller querying the services over HTTP.
    pub fn http(config: ServiceConfig) -> Result<Self, PlantMapError> {
        Ok(Self::new(HttpDataSource::new(config)?))
    }
}

impl<S: DataSource> ControllerBuilder<S> {
    /// Initializes a builder for a controller loading data from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: SyncConfig::default(),
            messenger: None,
            bounds: None,
            filter: FilterSet::all(),
            visibility: LayerVisibility::default(),
        }
    }

    /// Sets request timing.
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the messenger notified about layer changes.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Arc::new(messenger));
        self
    }

    /// Sets initial viewport bounds. Nothing is loaded until
    /// [`refresh`](LayerSyncController::refresh) is called.
    pub fn with_bounds(mut self, bounds: ViewportBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Sets initial technology filter.
    pub fn with_filter(mut self, filter: FilterSet) -> Self {
        self.filter = filter;
        self
    }

    /// Sets initial layer visibility.
    pub fn with_visibility(mut self, visibility: LayerVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Consumes the builder and creates the controller.
    pub fn build(self) -> LayerSyncController<S> {
        LayerSyncController {
            inner: Arc::new(Inner {
                source: self.source,
                config: self.config,
                messenger: self.messenger,
                state: RwLock::new(SyncState {
                    bounds: self.bounds,
                    filter: self.filter,
                    visibility: self.visibility,
                    stations: Cached::default(),
                    plants: Cached::default(),
                    layers: MapLayers::default(),
                }),
                station_requests: RequestTracker::new(),
                plant_requests: RequestTracker::new(),
            }),
        }
    }
}
