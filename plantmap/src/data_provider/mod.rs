//! Sources of station and plant data.

use std::sync::Arc;

use async_trait::async_trait;
use plantmap_types::{LatLon, ViewportBounds};

use crate::error::PlantMapError;
use crate::model::{Plant, Station};

mod http;
mod payload;

pub use http::HttpDataSource;

/// The two bounds-filtered query services and the click telemetry endpoint.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Loads weather stations inside the bounds.
    async fn fetch_stations(&self, bounds: &ViewportBounds) -> Result<Vec<Station>, PlantMapError>;
    /// Loads power plants inside the bounds.
    async fn fetch_plants(&self, bounds: &ViewportBounds) -> Result<Vec<Plant>, PlantMapError>;
    /// Records a click on the map.
    async fn record_click(&self, position: LatLon) -> Result<(), PlantMapError>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    async fn fetch_stations(&self, bounds: &ViewportBounds) -> Result<Vec<Station>, PlantMapError> {
        (**self).fetch_stations(bounds).await
    }

    async fn fetch_plants(&self, bounds: &ViewportBounds) -> Result<Vec<Plant>, PlantMapError> {
        (**self).fetch_plants(bounds).await
    }

    async fn record_click(&self, position: LatLon) -> Result<(), PlantMapError> {
        (**self).record_click(position).await
    }
}
