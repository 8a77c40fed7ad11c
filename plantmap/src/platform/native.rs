use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::header::CONTENT_TYPE;

use super::{HttpResponse, PlatformService};
use crate::error::PlantMapError;

/// [`PlatformService`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct NativePlatformService {
    http_client: reqwest::Client,
}

impl NativePlatformService {
    /// Creates a new client sending the given `User-Agent` header.
    pub fn new(user_agent: &str) -> Result<Self, PlantMapError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| PlantMapError::Generic(format!("failed to create http client: {err}")))?;

        Ok(Self { http_client })
    }

    async fn read_response(
        url: &str,
        response: reqwest::Response,
    ) -> Result<HttpResponse, PlantMapError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| network_error(url, err))?;
        debug!("{url} responded with {status}, {} bytes", body.len());

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl PlatformService for NativePlatformService {
    async fn get(&self, url: &str) -> Result<HttpResponse, PlantMapError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|err| network_error(url, err))?;

        Self::read_response(url, response).await
    }

    async fn post_json(&self, url: &str, body: Bytes) -> Result<HttpResponse, PlantMapError> {
        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| network_error(url, err))?;

        Self::read_response(url, response).await
    }
}

fn network_error(url: &str, err: reqwest::Error) -> PlantMapError {
    PlantMapError::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}
