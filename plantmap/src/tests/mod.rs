use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use plantmap_types::{LatLon, ViewportBounds};
use tokio::sync::oneshot;

use crate::data_provider::DataSource;
use crate::error::PlantMapError;
use crate::layer::LayerKind;
use crate::messenger::Messenger;
use crate::model::{Plant, Station};
use crate::platform::{HttpResponse, PlatformService};

pub fn plant(name: &str, breakdown: &[(&str, f64)], total_capacity_mw: f64) -> Plant {
    Plant {
        plant_code: None,
        plant_name: name.to_string(),
        utility_name: format!("{name} Utility"),
        latitude: 37.7749,
        longitude: -122.4194,
        total_capacity_mw,
        tech_breakdown: breakdown
            .iter()
            .map(|(tech, capacity)| (tech.to_string(), *capacity))
            .collect(),
    }
}

pub fn station(id: &str, latitude: f64, longitude: f64) -> Station {
    Station {
        id: id.to_string(),
        name: format!("Station {id}"),
        latitude,
        longitude,
    }
}

/// Platform service returning the same response to every request and recording the requests as
/// `(method, url, body)`.
#[derive(Clone)]
pub struct MockPlatform {
    response: Result<HttpResponse, PlantMapError>,
    requests: Arc<Mutex<Vec<(String, String, Option<String>)>>>,
}

impl MockPlatform {
    pub fn responding(response: HttpResponse) -> Self {
        Self {
            response: Ok(response),
            requests: Default::default(),
        }
    }

    pub fn failing(error: PlantMapError) -> Self {
        Self {
            response: Err(error),
            requests: Default::default(),
        }
    }

    pub fn requests(&self) -> Vec<(String, String, Option<String>)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatform {
    async fn get(&self, url: &str) -> Result<HttpResponse, PlantMapError> {
        self.requests
            .lock()
            .push(("GET".to_string(), url.to_string(), None));
        self.response.clone()
    }

    async fn post_json(&self, url: &str, body: Bytes) -> Result<HttpResponse, PlantMapError> {
        self.requests.lock().push((
            "POST".to_string(),
            url.to_string(),
            Some(String::from_utf8_lossy(&body).into_owned()),
        ));
        self.response.clone()
    }
}

/// Response of a [`MockDataSource`] call, either ready or released later by the test.
pub enum Scripted<T> {
    Ready(Result<T, PlantMapError>),
    Gated(oneshot::Receiver<Result<T, PlantMapError>>),
}

impl<T> Scripted<T> {
    /// Creates a response that is returned only after the test sends it through the sender.
    pub fn gated() -> (oneshot::Sender<Result<T, PlantMapError>>, Self) {
        let (sender, receiver) = oneshot::channel();
        (sender, Self::Gated(receiver))
    }

    async fn resolve(self) -> Result<T, PlantMapError> {
        match self {
            Self::Ready(result) => result,
            Self::Gated(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(PlantMapError::Generic("gate dropped".into()))),
        }
    }
}

/// Data source returning scripted responses in order. When the script is exhausted the default
/// response is returned.
pub struct MockDataSource {
    stations: Mutex<VecDeque<Scripted<Vec<Station>>>>,
    plants: Mutex<VecDeque<Scripted<Vec<Plant>>>>,
    default_stations: Mutex<Result<Vec<Station>, PlantMapError>>,
    default_plants: Mutex<Result<Vec<Plant>, PlantMapError>>,
    click_result: Mutex<Result<(), PlantMapError>>,
    station_calls: AtomicUsize,
    plant_calls: AtomicUsize,
    clicks: Mutex<Vec<LatLon>>,
    requested_bounds: Mutex<Vec<ViewportBounds>>,
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self {
            stations: Default::default(),
            plants: Default::default(),
            default_stations: Mutex::new(Ok(vec![])),
            default_plants: Mutex::new(Ok(vec![])),
            click_result: Mutex::new(Ok(())),
            station_calls: AtomicUsize::new(0),
            plant_calls: AtomicUsize::new(0),
            clicks: Default::default(),
            requested_bounds: Default::default(),
        }
    }
}

impl MockDataSource {
    pub fn new(stations: Vec<Station>, plants: Vec<Plant>) -> Arc<Self> {
        let source = Self::default();
        *source.default_stations.lock() = Ok(stations);
        *source.default_plants.lock() = Ok(plants);
        Arc::new(source)
    }

    pub fn set_stations(&self, result: Result<Vec<Station>, PlantMapError>) {
        *self.default_stations.lock() = result;
    }

    pub fn set_plants(&self, result: Result<Vec<Plant>, PlantMapError>) {
        *self.default_plants.lock() = result;
    }

    pub fn set_click_result(&self, result: Result<(), PlantMapError>) {
        *self.click_result.lock() = result;
    }

    pub fn push_stations(&self, response: Scripted<Vec<Station>>) {
        self.stations.lock().push_back(response);
    }

    pub fn push_plants(&self, response: Scripted<Vec<Plant>>) {
        self.plants.lock().push_back(response);
    }

    pub fn station_calls(&self) -> usize {
        self.station_calls.load(Ordering::SeqCst)
    }

    pub fn plant_calls(&self) -> usize {
        self.plant_calls.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> Vec<LatLon> {
        self.clicks.lock().clone()
    }

    pub fn requested_bounds(&self) -> Vec<ViewportBounds> {
        self.requested_bounds.lock().clone()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_stations(&self, bounds: &ViewportBounds) -> Result<Vec<Station>, PlantMapError> {
        self.requested_bounds.lock().push(*bounds);
        self.station_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.stations.lock().pop_front();
        let scripted =
            scripted.unwrap_or_else(|| Scripted::Ready(self.default_stations.lock().clone()));
        scripted.resolve().await
    }

    async fn fetch_plants(&self, bounds: &ViewportBounds) -> Result<Vec<Plant>, PlantMapError> {
        self.requested_bounds.lock().push(*bounds);
        self.plant_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.plants.lock().pop_front();
        let scripted =
            scripted.unwrap_or_else(|| Scripted::Ready(self.default_plants.lock().clone()));
        scripted.resolve().await
    }

    async fn record_click(&self, position: LatLon) -> Result<(), PlantMapError> {
        self.clicks.lock().push(position);
        self.click_result.lock().clone()
    }
}

#[derive(Default)]
pub struct RecordingMessenger {
    changes: Mutex<Vec<LayerKind>>,
}

impl RecordingMessenger {
    pub fn take(&self) -> Vec<LayerKind> {
        std::mem::take(&mut *self.changes.lock())
    }
}

impl Messenger for RecordingMessenger {
    fn layer_changed(&self, layer: LayerKind) {
        self.changes.lock().push(layer);
    }
}
