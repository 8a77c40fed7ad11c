//! The three visual layers the controller keeps in sync and the render step that derives their
//! contents.
//!
//! Layer contents are a pure function of the cached station and plant lists, the technology
//! filter and layer visibility (see [`MapLayers::render`]). The hosting map widget reads them
//! and draws markers, clusters and the heat layer however it likes.

use serde::{Deserialize, Serialize};

use crate::filter::FilterSet;
use crate::model::{Plant, Station};

mod heatmap;
mod marker;

pub use heatmap::HeatPoint;
pub use marker::{PlantMarker, StationMarker};

/// Identifies one of the visual layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Weather station markers.
    Stations,
    /// Power plant markers.
    PlantMarkers,
    /// Capacity heatmap.
    Heatmap,
}

impl LayerKind {
    /// All layers in drawing order.
    pub const ALL: [LayerKind; 3] = [Self::Stations, Self::PlantMarkers, Self::Heatmap];
}

/// Visibility flag of every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    /// Weather station markers are shown.
    pub stations: bool,
    /// Power plant markers are shown.
    pub plant_markers: bool,
    /// Capacity heatmap is shown.
    pub heatmap: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            stations: true,
            plant_markers: true,
            heatmap: false,
        }
    }
}

impl LayerVisibility {
    /// Every layer hidden.
    pub fn none() -> Self {
        Self {
            stations: false,
            plant_markers: false,
            heatmap: false,
        }
    }

    /// Every layer shown.
    pub fn all() -> Self {
        Self {
            stations: true,
            plant_markers: true,
            heatmap: true,
        }
    }

    /// Returns true if the layer is shown.
    pub fn is_visible(&self, layer: LayerKind) -> bool {
        match layer {
            LayerKind::Stations => self.stations,
            LayerKind::PlantMarkers => self.plant_markers,
            LayerKind::Heatmap => self.heatmap,
        }
    }

    /// Sets visibility of the layer.
    pub fn set(&mut self, layer: LayerKind, visible: bool) {
        match layer {
            LayerKind::Stations => self.stations = visible,
            LayerKind::PlantMarkers => self.plant_markers = visible,
            LayerKind::Heatmap => self.heatmap = visible,
        }
    }

    /// Flips visibility of the layer and returns the new value.
    pub fn toggle(&mut self, layer: LayerKind) -> bool {
        let visible = !self.is_visible(layer);
        self.set(layer, visible);
        visible
    }

    /// Returns true if any layer built from plant data is shown.
    pub fn needs_plants(&self) -> bool {
        self.plant_markers || self.heatmap
    }
}

/// Rendered contents of all three layers. Hidden layers are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapLayers {
    stations: Vec<StationMarker>,
    plant_markers: Vec<PlantMarker>,
    heatmap: Vec<HeatPoint>,
}

impl MapLayers {
    /// Derives layer contents from the cached data.
    pub fn render(
        stations: &[Station],
        plants: &[Plant],
        filter: &FilterSet,
        visibility: LayerVisibility,
    ) -> Self {
        Self {
            stations: if visibility.stations {
                marker::station_markers(stations)
            } else {
                vec![]
            },
            plant_markers: if visibility.plant_markers {
                marker::plant_markers(plants, filter)
            } else {
                vec![]
            },
            heatmap: if visibility.heatmap {
                heatmap::heat_points(plants, filter)
            } else {
                vec![]
            },
        }
    }

    /// Station markers.
    pub fn stations(&self) -> &[StationMarker] {
        &self.stations
    }

    /// Power plant markers.
    pub fn plant_markers(&self) -> &[PlantMarker] {
        &self.plant_markers
    }

    /// Heatmap input points.
    pub fn heatmap(&self) -> &[HeatPoint] {
        &self.heatmap
    }

    /// Number of items in the given layer.
    pub fn len(&self, layer: LayerKind) -> usize {
        match layer {
            LayerKind::Stations => self.stations.len(),
            LayerKind::PlantMarkers => self.plant_markers.len(),
            LayerKind::Heatmap => self.heatmap.len(),
        }
    }

    /// Returns true if the given layer has nothing to draw.
    pub fn is_empty(&self, layer: LayerKind) -> bool {
        self.len(layer) == 0
    }

    /// Layers whose contents differ between `self` and `other`.
    pub fn changed_layers(&self, other: &MapLayers) -> Vec<LayerKind> {
        let mut changed = vec![];
        if self.stations != other.stations {
            changed.push(LayerKind::Stations);
        }
        if self.plant_markers != other.plant_markers {
            changed.push(LayerKind::PlantMarkers);
        }
        if self.heatmap != other.heatmap {
            changed.push(LayerKind::Heatmap);
        }

        changed
    }
}
