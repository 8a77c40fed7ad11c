//! HTTP transport used by [`HttpDataSource`](crate::data_provider::HttpDataSource).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::PlantMapError;

mod native;
pub use native::NativePlatformService;

/// Raw response of the service: status code and body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    /// Creates a new response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Service executing HTTP requests. Transport failures are returned as errors, while any
/// response from the server, including error statuses, is returned as [`HttpResponse`].
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Executes a GET request.
    async fn get(&self, url: &str) -> Result<HttpResponse, PlantMapError>;
    /// Executes a POST request with the given JSON body.
    async fn post_json(&self, url: &str, body: Bytes) -> Result<HttpResponse, PlantMapError>;
}
