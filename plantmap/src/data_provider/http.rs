use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use plantmap_types::{LatLon, ViewportBounds};

use super::payload::{self, ClickPayload};
use super::DataSource;
use crate::config::ServiceConfig;
use crate::error::PlantMapError;
use crate::model::{Plant, Station};
use crate::platform::{NativePlatformService, PlatformService};

/// [`DataSource`] querying the station and plant services over HTTP.
///
/// ```no_run
/// use plantmap::config::ServiceConfig;
/// use plantmap::data_provider::{DataSource, HttpDataSource};
/// use plantmap::plantmap_types::ViewportBounds;
///
/// # tokio_test::block_on(async {
/// let source = HttpDataSource::new(ServiceConfig::default())?;
/// let bounds = ViewportBounds::from_coords(37.6, -122.6, 37.9, -122.2)?;
/// let plants = source.fetch_plants(&bounds).await?;
/// # Ok::<(), plantmap::error::PlantMapError>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct HttpDataSource<P = NativePlatformService> {
    config: ServiceConfig,
    platform: P,
}

impl HttpDataSource<NativePlatformService> {
    /// Creates a source using a native HTTP client.
    pub fn new(config: ServiceConfig) -> Result<Self, PlantMapError> {
        let platform = NativePlatformService::new(&config.user_agent)?;
        Ok(Self { config, platform })
    }
}

impl<P: PlatformService> HttpDataSource<P> {
    /// Creates a source sending requests through the given platform service.
    pub fn with_platform(config: ServiceConfig, platform: P) -> Self {
        Self { config, platform }
    }

    /// Endpoint configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn bounds_url(base: &str, bounds: &ViewportBounds) -> String {
        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}{}", bounds.query_string())
    }
}

#[async_trait]
impl<P: PlatformService> DataSource for HttpDataSource<P> {
    async fn fetch_stations(&self, bounds: &ViewportBounds) -> Result<Vec<Station>, PlantMapError> {
        let url = Self::bounds_url(&self.config.stations_url, bounds);
        debug!("Loading stations from {url}");
        let response = self.platform.get(&url).await?;
        payload::decode_stations(&url, response)
    }

    async fn fetch_plants(&self, bounds: &ViewportBounds) -> Result<Vec<Plant>, PlantMapError> {
        let url = Self::bounds_url(&self.config.plants_url, bounds);
        debug!("Loading plants from {url}");
        let response = self.platform.get(&url).await?;
        payload::decode_plants(&url, response)
    }

    async fn record_click(&self, position: LatLon) -> Result<(), PlantMapError> {
        let body = serde_json::to_vec(&ClickPayload {
            latitude: position.lat(),
            longitude: position.lon(),
        })?;
        let url = &self.config.clicks_url;
        let response = self.platform.post_json(url, Bytes::from(body)).await?;
        payload::check_status(url, &response)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use plantmap_types::latlon;

    use super::*;
    use crate::platform::HttpResponse;
    use crate::tests::MockPlatform;

    fn bounds() -> ViewportBounds {
        ViewportBounds::from_coords(37.5, -122.75, 38.0, -122.25).unwrap()
    }

    #[tokio::test]
    async fn plants_request_url() {
        let platform = MockPlatform::responding(HttpResponse::new(200, "[]"));
        let source = HttpDataSource::with_platform(ServiceConfig::default(), platform.clone());

        let plants = source.fetch_plants(&bounds()).await.unwrap();
        assert!(plants.is_empty());
        assert_eq!(
            platform.requests(),
            vec![(
                "GET".to_string(),
                "http://127.0.0.1:8000/plants?southWestLat=37.5&southWestLng=-122.75&northEastLat=38&northEastLng=-122.25".to_string(),
                None
            )]
        );
    }

    #[tokio::test]
    async fn stations_request_url_with_existing_query() {
        let platform = MockPlatform::responding(HttpResponse::new(200, "{}"));
        let config = ServiceConfig {
            stations_url: "http://stations.local/weather-stations?limit=100".into(),
            ..Default::default()
        };
        let source = HttpDataSource::with_platform(config, platform.clone());

        let stations = source.fetch_stations(&bounds()).await.unwrap();
        assert!(stations.is_empty());
        assert!(platform.requests()[0]
            .1
            .starts_with("http://stations.local/weather-stations?limit=100&southWestLat="));
    }

    #[tokio::test]
    async fn click_body() {
        let platform = MockPlatform::responding(HttpResponse::new(
            200,
            r#"{"latitude": 37.7, "longitude": -122.4}"#,
        ));
        let source = HttpDataSource::with_platform(ServiceConfig::default(), platform.clone());

        source.record_click(latlon!(37.7, -122.4)).await.unwrap();
        assert_eq!(
            platform.requests(),
            vec![(
                "POST".to_string(),
                "http://127.0.0.1:8000/clicks/".to_string(),
                Some(r#"{"latitude":37.7,"longitude":-122.4}"#.to_string())
            )]
        );
    }

    #[tokio::test]
    async fn click_failure_status() {
        let platform = MockPlatform::responding(HttpResponse::new(422, r#"{"detail": []}"#));
        let source = HttpDataSource::with_platform(ServiceConfig::default(), platform);

        assert_matches!(
            source.record_click(latlon!(0.0, 0.0)).await,
            Err(PlantMapError::Status { status: 422, .. })
        );
    }

    #[tokio::test]
    async fn transport_failure_is_passed_through() {
        let platform = MockPlatform::failing(PlantMapError::Network {
            url: "http://127.0.0.1:8000/plants".into(),
            message: "connection refused".into(),
        });
        let source = HttpDataSource::with_platform(ServiceConfig::default(), platform);

        assert_matches!(
            source.fetch_plants(&bounds()).await,
            Err(PlantMapError::Network { .. })
        );
    }
}
