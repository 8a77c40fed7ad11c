//! Records returned by the station and plant query services.

use std::collections::BTreeMap;

use plantmap_types::LatLon;
use serde::{Deserialize, Serialize};

/// Weather station. Stations are displayed as is, without any filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Station identifier assigned by the weather service.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Station {
    /// Location of the station.
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

/// Power plant with its installed capacity split by generation technology.
///
/// The plant service may omit the capacity fields, in which case the plant has an empty
/// breakdown and zero total capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    /// Plant code in the source registry.
    #[serde(default)]
    pub plant_code: Option<i64>,
    /// Plant name.
    pub plant_name: String,
    /// Name of the operating utility.
    #[serde(default)]
    pub utility_name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Total installed capacity in MW.
    #[serde(default)]
    pub total_capacity_mw: f64,
    /// Installed capacity in MW by technology name.
    #[serde(default)]
    pub tech_breakdown: BTreeMap<String, f64>,
}

impl Plant {
    /// Location of the plant.
    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// Names of the technologies present at the plant.
    pub fn technologies(&self) -> impl Iterator<Item = &str> {
        self.tech_breakdown.keys().map(String::as_str)
    }
}
