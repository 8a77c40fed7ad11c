//! Response shapes of the services and conversion of raw responses into records.

use serde::{Deserialize, Serialize};

use crate::error::PlantMapError;
use crate::model::{Plant, Station};
use crate::platform::HttpResponse;

/// Station service body. A region without stations comes as `{}` or `{"message": ...}`.
#[derive(Debug, Deserialize)]
struct StationsPayload {
    #[serde(default)]
    results: Vec<Station>,
}

/// Plant service body: a list of plants, or an error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlantsPayload {
    Plants(Vec<Plant>),
    Error { detail: String },
}

/// Error body of either service.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    detail: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ClickPayload {
    pub latitude: f64,
    pub longitude: f64,
}

pub(super) fn decode_stations(
    url: &str,
    response: HttpResponse,
) -> Result<Vec<Station>, PlantMapError> {
    let body = checked_body(url, &response)?;
    let payload: StationsPayload = serde_json::from_slice(body)?;
    Ok(payload.results)
}

pub(super) fn decode_plants(
    url: &str,
    response: HttpResponse,
) -> Result<Vec<Plant>, PlantMapError> {
    let body = checked_body(url, &response)?;
    match serde_json::from_slice(body)? {
        PlantsPayload::Plants(plants) => Ok(plants),
        PlantsPayload::Error { detail } => Err(PlantMapError::Service(detail)),
    }
}

pub(super) fn check_status(url: &str, response: &HttpResponse) -> Result<(), PlantMapError> {
    if response.is_success() {
        return Ok(());
    }

    let payload: ErrorPayload = serde_json::from_slice(&response.body).unwrap_or_default();
    Err(PlantMapError::Status {
        url: url.to_string(),
        status: response.status,
        detail: payload.detail.or(payload.error),
    })
}

fn checked_body<'a>(url: &str, response: &'a HttpResponse) -> Result<&'a [u8], PlantMapError> {
    check_status(url, response)?;
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Err(PlantMapError::Decoding(format!("empty response from {url}")));
    }

    Ok(&response.body)
}
