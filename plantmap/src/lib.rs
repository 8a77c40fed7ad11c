//! Plantmap keeps three data layers of a web map in sync with two query services: weather
//! station markers, power plant markers and a plant capacity heatmap.
//!
//! # Quick start
//!
//! ```no_run
//! use plantmap::config::ServiceConfig;
//! use plantmap::{ControllerBuilder, FilterSet, LayerKind};
//! use plantmap::plantmap_types::ViewportBounds;
//!
//! # tokio_test::block_on(async {
//! let controller = ControllerBuilder::http(ServiceConfig::default())?.build();
//!
//! // The map reported a new view
//! let bounds = ViewportBounds::from_coords(37.6, -122.6, 37.9, -122.2)?;
//! controller.on_viewport_settled(bounds).await;
//!
//! // The user applied a technology filter and turned on the heatmap
//! controller.on_filter_changed(FilterSet::from_iter(["solar", "wind"]));
//! controller.on_visibility_toggled(LayerKind::Heatmap).await;
//!
//! for point in controller.layers().heatmap() {
//!     println!("{:?}: {}", point.position, point.weight);
//! }
//! # Ok::<(), plantmap::error::PlantMapError>(())
//! # });
//! ```
//!
//! # Main components
//!
//! * [`LayerSyncController`] owns viewport bounds, the [`FilterSet`], layer visibility and the
//!   last fetched data, and decides what to fetch on every UI event.
//! * [`DataSource`](data_provider::DataSource) abstracts the services;
//!   [`HttpDataSource`](data_provider::HttpDataSource) talks to them over HTTP.
//! * [`MapLayers`](layer::MapLayers) is the rendered state of the layers the map widget draws.
//! * [`Messenger`] tells the host which layers need to be redrawn.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub(crate) mod async_runtime;
pub mod config;
pub mod controller;
pub mod data_provider;
pub mod error;
pub mod filter;
pub mod layer;
mod messenger;
pub mod model;
pub mod platform;

#[cfg(test)]
pub(crate) mod tests;

pub use controller::{ControllerBuilder, FetchOutcome, LayerSyncController, SyncReport};
pub use filter::{filter_plants, heat_weight, FilterSet};
pub use layer::{LayerKind, LayerVisibility};
pub use messenger::{DummyMessenger, Messenger};

// Reexport plantmap_types
pub use plantmap_types;
