// [libs/core/geo/src/coordinate.rs]
use crate::errors::GeoError;
use serde::{Deserialize, Serialize};

/// A validated WGS-84 point: latitude in `[-90, 90]`, longitude in `[-180, 180]`.
///
/// Construction always goes through [`LatLon::new`], so any `LatLon` in hand
/// is already known-valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    /// Validates and constructs a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Returns the latitude component.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude component.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinates() {
        assert!(LatLon::new(52.2297, 21.0122).is_ok());
        assert!(LatLon::new(-90.0, -180.0).is_ok());
        assert!(LatLon::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert_eq!(
            LatLon::new(90.1, 0.0).unwrap_err(),
            GeoError::LatitudeOutOfRange(90.1)
        );
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert_eq!(
            LatLon::new(0.0, 180.1).unwrap_err(),
            GeoError::LongitudeOutOfRange(180.1)
        );
    }
}
