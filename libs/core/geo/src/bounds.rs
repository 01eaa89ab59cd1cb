// [libs/core/geo/src/bounds.rs]
use crate::coordinate::LatLon;
use crate::errors::GeoError;

/// An axis-aligned latitude/longitude bounding box, `(south_west, north_east)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    south_west: LatLon,
    north_east: LatLon,
}

impl BoundingBox {
    /// Builds a bounding box from its two corners.
    pub fn new(south_west: LatLon, north_east: LatLon) -> Self {
        Self { south_west, north_east }
    }

    /// Parses the `bounds=lat1,lng1,lat2,lng2` query parameter shape.
    ///
    /// Invalid filter values are treated as absent rather than
    /// rejected — callers should drop the bounds filter on `Err`, not
    /// surface a `400`.
    pub fn parse_csv(raw: &str) -> Result<Self, GeoError> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        let [lat1, lng1, lat2, lng2] = parts.as_slice() else {
            return Err(GeoError::MalformedBounds(raw.to_string()));
        };
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|_| GeoError::MalformedBounds(raw.to_string()))
        };
        let (lat1, lng1, lat2, lng2) = (parse(lat1)?, parse(lng1)?, parse(lat2)?, parse(lng2)?);

        let south_west = LatLon::new(lat1.min(lat2), lng1.min(lng2))
            .map_err(|_| GeoError::MalformedBounds(raw.to_string()))?;
        let north_east = LatLon::new(lat1.max(lat2), lng1.max(lng2))
            .map_err(|_| GeoError::MalformedBounds(raw.to_string()))?;

        Ok(Self { south_west, north_east })
    }

    /// Returns the south-west corner.
    pub fn south_west(&self) -> LatLon {
        self.south_west
    }

    /// Returns the north-east corner.
    pub fn north_east(&self) -> LatLon {
        self.north_east
    }

    /// True if `point` lies within the box, inclusive of its edges.
    pub fn contains(&self, point: LatLon) -> bool {
        point.latitude >= self.south_west.latitude
        && point.latitude <= self.north_east.latitude
        && point.longitude >= self.south_west.longitude
        && point.longitude <= self.north_east.longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_csv() {
        let bbox = BoundingBox::parse_csv("52.0,20.5,52.5,21.5").unwrap();
        assert_eq!(bbox.south_west.latitude, 52.0);
        assert_eq!(bbox.north_east.longitude, 21.5);
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(BoundingBox::parse_csv("52.0,20.5,52.5").is_err());
    }

    #[test]
    fn contains_checks_inclusive_edges() {
        let bbox = BoundingBox::parse_csv("52.0,20.5,52.5,21.5").unwrap();
        assert!(bbox.contains(LatLon::new(52.23, 21.01).unwrap()));
        assert!(!bbox.contains(LatLon::new(51.51, -0.13).unwrap()));
    }
}
