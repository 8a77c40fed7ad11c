//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// A coordinate is NaN or infinite.
    #[error("coordinate {0} is not a finite number")]
    NonFinite(f64),
    /// Latitude outside of [-90, 90].
    #[error("latitude {0} is out of range")]
    LatitudeOutOfRange(f64),
    /// South-west corner lies north or east of the north-east corner.
    #[error("south-west corner ({sw_lat}, {sw_lng}) is not below and left of north-east corner ({ne_lat}, {ne_lng})")]
    InvertedBounds {
        /// South-west latitude.
        sw_lat: f64,
        /// South-west longitude.
        sw_lng: f64,
        /// North-east latitude.
        ne_lat: f64,
        /// North-east longitude.
        ne_lng: f64,
    },
}
