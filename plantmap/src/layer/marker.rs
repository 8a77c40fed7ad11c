use std::collections::BTreeMap;

use plantmap_types::LatLon;

use crate::filter::{filter_plants, FilterSet};
use crate::model::{Plant, Station};

/// Marker of a weather station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMarker {
    /// Station identifier.
    pub id: String,
    /// Station name, shown in the marker popup.
    pub name: String,
    /// Marker location.
    pub position: LatLon,
}

/// Marker of a power plant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantMarker {
    /// Plant name.
    pub plant_name: String,
    /// Operating utility.
    pub utility_name: String,
    /// Marker location.
    pub position: LatLon,
    /// Total installed capacity of the plant in MW.
    pub total_capacity_mw: f64,
    /// Technologies to display: only the ones selected by the filter, or all of them if the
    /// filter is empty.
    pub technologies: BTreeMap<String, f64>,
}

pub(super) fn station_markers(stations: &[Station]) -> Vec<StationMarker> {
    stations
        .iter()
        .map(|station| StationMarker {
            id: station.id.clone(),
            name: station.name.clone(),
            position: station.position(),
        })
        .collect()
}

pub(super) fn plant_markers(plants: &[Plant], filter: &FilterSet) -> Vec<PlantMarker> {
    filter_plants(plants, filter)
        .into_iter()
        .map(|matched| PlantMarker {
            plant_name: matched.plant.plant_name.clone(),
            utility_name: matched.plant.utility_name.clone(),
            position: matched.plant.position(),
            total_capacity_mw: matched.plant.total_capacity_mw,
            technologies: matched.technologies,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{plant, station};

    #[test]
    fn station_marker_copies_fields() {
        let markers = station_markers(&[station("GHCND:USW00023272", 37.7706, -122.4269)]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, "GHCND:USW00023272");
        assert_eq!(markers[0].position, LatLon::new(37.7706, -122.4269));
    }

    #[test]
    fn plant_marker_shows_filtered_breakdown() {
        let plants = vec![
            plant("A", &[("solar", 10.0), ("wind", 5.0)], 15.0),
            plant("B", &[("gas", 20.0)], 20.0),
        ];

        let markers = plant_markers(&plants, &FilterSet::from_iter(["solar"]));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].plant_name, "A");
        assert_eq!(markers[0].total_capacity_mw, 15.0);
        assert_eq!(
            markers[0].technologies,
            BTreeMap::from([("solar".to_string(), 10.0)])
        );
    }
}
