//! Geographic value types used by `plantmap`: points in latitude/longitude and the rectangular
//! viewport region the map reports when its view settles.

mod bounds;
pub mod error;
mod geo;

pub use bounds::ViewportBounds;
pub use error::TypesError;
pub use geo::LatLon;
