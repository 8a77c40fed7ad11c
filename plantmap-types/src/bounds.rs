use serde::{Deserialize, Serialize};

use crate::error::TypesError;
use crate::geo::LatLon;

/// Rectangular region of the map in geographic coordinates, given by its south-west and
/// north-east corners.
///
/// Latitudes are limited to `[-90, 90]`. Longitudes are not range-checked since a map that is
/// panned across the antimeridian reports longitudes beyond `±180`.
///
/// ```
/// use plantmap_types::{latlon, ViewportBounds};
///
/// let bounds = ViewportBounds::new(latlon!(37.0, -123.0), latlon!(38.0, -122.0))?;
/// assert!(bounds.contains(&latlon!(37.7749, -122.4194)));
/// # Ok::<(), plantmap_types::TypesError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewportBounds")]
pub struct ViewportBounds {
    south_west: LatLon,
    north_east: LatLon,
}

/// Deserialized corners before validation.
#[derive(Deserialize)]
struct RawViewportBounds {
    south_west: LatLon,
    north_east: LatLon,
}

impl TryFrom<RawViewportBounds> for ViewportBounds {
    type Error = TypesError;

    fn try_from(raw: RawViewportBounds) -> Result<Self, Self::Error> {
        Self::new(raw.south_west, raw.north_east)
    }
}

impl ViewportBounds {
    /// Creates bounds from two corners, validating them.
    pub fn new(south_west: LatLon, north_east: LatLon) -> Result<Self, TypesError> {
        for value in [
            south_west.lat(),
            south_west.lon(),
            north_east.lat(),
            north_east.lon(),
        ] {
            if !value.is_finite() {
                return Err(TypesError::NonFinite(value));
            }
        }

        for lat in [south_west.lat(), north_east.lat()] {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(TypesError::LatitudeOutOfRange(lat));
            }
        }

        if south_west.lat() > north_east.lat() || south_west.lon() > north_east.lon() {
            return Err(TypesError::InvertedBounds {
                sw_lat: south_west.lat(),
                sw_lng: south_west.lon(),
                ne_lat: north_east.lat(),
                ne_lng: north_east.lon(),
            });
        }

        Ok(Self {
            south_west,
            north_east,
        })
    }

    /// Creates bounds from the four numbers in the order the query services accept them.
    pub fn from_coords(
        south_west_lat: f64,
        south_west_lng: f64,
        north_east_lat: f64,
        north_east_lng: f64,
    ) -> Result<Self, TypesError> {
        Self::new(
            LatLon::new(south_west_lat, south_west_lng),
            LatLon::new(north_east_lat, north_east_lng),
        )
    }

    /// South-west corner.
    pub fn south_west(&self) -> LatLon {
        self.south_west
    }

    /// North-east corner.
    pub fn north_east(&self) -> LatLon {
        self.north_east
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.north_east.lat() - self.south_west.lat()
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.north_east.lon() - self.south_west.lon()
    }

    /// Center of the region.
    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.south_west.lat() + self.north_east.lat()) / 2.0,
            (self.south_west.lon() + self.north_east.lon()) / 2.0,
        )
    }

    /// Returns true if the point is inside the region or on its border.
    pub fn contains(&self, point: &LatLon) -> bool {
        self.south_west.lat() <= point.lat()
            && self.north_east.lat() >= point.lat()
            && self.south_west.lon() <= point.lon()
            && self.north_east.lon() >= point.lon()
    }

    /// Query parameters identifying the region, in the order the services expect them.
    pub fn query_pairs(&self) -> [(&'static str, f64); 4] {
        [
            ("southWestLat", self.south_west.lat()),
            ("southWestLng", self.south_west.lon()),
            ("northEastLat", self.north_east.lat()),
            ("northEastLng", self.north_east.lon()),
        ]
    }

    /// Encodes [`query_pairs`](Self::query_pairs) as a `key=value&...` string.
    pub fn query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;

    #[test]
    fn rejects_non_finite() {
        assert!(matches!(
            ViewportBounds::from_coords(f64::NAN, 0.0, 1.0, 1.0),
            Err(TypesError::NonFinite(v)) if v.is_nan()
        ));
        assert!(matches!(
            ViewportBounds::from_coords(0.0, f64::INFINITY, 1.0, 1.0),
            Err(TypesError::NonFinite(_))
        ));
    }

    #[test]
    fn rejects_latitude_out_of_range() {
        assert_eq!(
            ViewportBounds::from_coords(-91.0, 0.0, 10.0, 10.0),
            Err(TypesError::LatitudeOutOfRange(-91.0))
        );
    }

    #[test]
    fn rejects_inverted_corners() {
        assert!(matches!(
            ViewportBounds::from_coords(10.0, 0.0, 0.0, 10.0),
            Err(TypesError::InvertedBounds { .. })
        ));
        assert!(matches!(
            ViewportBounds::from_coords(0.0, 10.0, 10.0, 0.0),
            Err(TypesError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn allows_wrapped_longitudes() {
        let bounds = ViewportBounds::from_coords(-10.0, 170.0, 10.0, 190.0).unwrap();
        assert_eq!(bounds.width(), 20.0);
        assert!(bounds.contains(&latlon!(0.0, 185.0)));
    }

    #[test]
    fn contains_includes_border() {
        let bounds = ViewportBounds::from_coords(37.0, -123.0, 38.0, -122.0).unwrap();
        assert!(bounds.contains(&latlon!(37.0, -123.0)));
        assert!(bounds.contains(&latlon!(38.0, -122.0)));
        assert!(!bounds.contains(&latlon!(38.1, -122.5)));
        assert_eq!(bounds.center(), latlon!(37.5, -122.5));
    }

    #[test]
    fn query_string_order() {
        let bounds = ViewportBounds::from_coords(37.5, -122.75, 38.25, -122.0).unwrap();
        assert_eq!(
            bounds.query_string(),
            "southWestLat=37.5&southWestLng=-122.75&northEastLat=38.25&northEastLng=-122"
        );
    }

    #[test]
    fn serde_round_trip_keeps_corners() {
        let bounds = ViewportBounds::from_coords(1.0, 2.0, 3.0, 4.0).unwrap();
        let json = serde_json::to_string(&bounds).unwrap();
        assert_eq!(
            json,
            r#"{"south_west":{"lat":1.0,"lon":2.0},"north_east":{"lat":3.0,"lon":4.0}}"#
        );
        let parsed: ViewportBounds = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bounds);
    }

    #[test]
    fn deserialization_validates_corners() {
        let out_of_range = serde_json::from_str::<ViewportBounds>(
            r#"{"south_west":{"lat":120.0,"lon":10.0},"north_east":{"lat":-95.0,"lon":0.0}}"#,
        );
        let error = out_of_range.unwrap_err().to_string();
        assert!(error.contains("120"), "{error}");

        let inverted = serde_json::from_str::<ViewportBounds>(
            r#"{"south_west":{"lat":10.0,"lon":0.0},"north_east":{"lat":0.0,"lon":10.0}}"#,
        );
        assert!(inverted.is_err());
    }
}
