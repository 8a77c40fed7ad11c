//! Technology filter applied to power plants before they are shown as markers or heat points.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::Plant;

/// Set of selected technology names.
///
/// An empty set means no filter: every plant is shown with its full technology breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet(BTreeSet<String>);

impl FilterSet {
    /// Filter that lets every plant through.
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns true if no technology is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the technology is selected.
    pub fn contains(&self, technology: &str) -> bool {
        self.0.contains(technology)
    }

    /// Iterates over the selected technologies in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of selected technologies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the plant should be displayed with this filter.
    pub fn matches(&self, plant: &Plant) -> bool {
        self.is_empty() || plant.technologies().any(|tech| self.contains(tech))
    }
}

impl<S: Into<String>> FromIterator<S> for FilterSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Plant that passed the filter, with the part of its breakdown that should be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantMatch<'a> {
    /// The matched plant.
    pub plant: &'a Plant,
    /// Technology breakdown restricted to the selected technologies, or the full breakdown if
    /// the filter is empty.
    pub technologies: BTreeMap<String, f64>,
}

/// Selects the plants that have at least one technology from `filter` (all plants if the filter
/// is empty) and restricts their technology breakdown to the selected technologies.
pub fn filter_plants<'a>(plants: &'a [Plant], filter: &FilterSet) -> Vec<PlantMatch<'a>> {
    plants
        .iter()
        .filter(|plant| filter.matches(plant))
        .map(|plant| PlantMatch {
            plant,
            technologies: plant
                .tech_breakdown
                .iter()
                .filter(|(tech, _)| filter.is_empty() || filter.contains(tech))
                .map(|(tech, capacity)| (tech.clone(), *capacity))
                .collect(),
        })
        .collect()
}

/// Intensity of the plant on the capacity heatmap.
///
/// With an empty filter this is the total capacity of the plant, otherwise the sum of the
/// capacities of the selected technologies. Negative and NaN results are reported as `0`.
pub fn heat_weight(plant: &Plant, filter: &FilterSet) -> f64 {
    let weight = if filter.is_empty() {
        plant.total_capacity_mw
    } else {
        plant
            .tech_breakdown
            .iter()
            .filter(|(tech, _)| filter.contains(tech))
            .map(|(_, capacity)| *capacity)
            .sum()
    };

    if weight > 0.0 {
        weight
    } else {
        0.0
    }
}
