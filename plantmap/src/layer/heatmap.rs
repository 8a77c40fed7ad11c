use plantmap_types::LatLon;

use crate::filter::{heat_weight, FilterSet};
use crate::model::Plant;

/// Input point of the capacity heatmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    /// Point location.
    pub position: LatLon,
    /// Intensity, always greater than zero.
    pub weight: f64,
}

pub(super) fn heat_points(plants: &[Plant], filter: &FilterSet) -> Vec<HeatPoint> {
    plants
        .iter()
        .filter(|plant| filter.matches(plant))
        .filter_map(|plant| {
            let weight = heat_weight(plant, filter);
            (weight > 0.0).then(|| HeatPoint {
                position: plant.position(),
                weight,
            })
        })
        .collect()
}
