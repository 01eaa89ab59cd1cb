// [libs/core/geo/src/distance.rs]
use crate::coordinate::LatLon;

/// Mean radius of the WGS-84 reference sphere, in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters.
///
/// Uses the haversine formula on the mean Earth sphere rather than a planar
/// approximation; the clustering engine's join radius is small (on the order
/// of 100 m) but still spans enough longitude at high latitudes for the
/// planar shortcut to mis-rank neighbors.
pub fn haversine_meters(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let sin_half_lat = (delta_lat / 2.0).sin();
    let sin_half_lon = (delta_lon / 2.0).sin();

    let h = sin_half_lat * sin_half_lat
        + lat1.cos() * lat2.cos() * sin_half_lon * sin_half_lon;
    let central_angle = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_METERS * central_angle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = LatLon::new(52.2297, 21.0122).unwrap();
        assert!(haversine_meters(p, p) < 1e-6);
    }

    #[test]
    fn known_short_distance_is_within_tolerance() {
        // Roughly 111 m apart along a meridian (~0.001 degree of latitude).
        let a = LatLon::new(52.2297, 21.0122).unwrap();
        let b = LatLon::new(52.2307, 21.0122).unwrap();
        let distance = haversine_meters(a, b);
        assert!((100.0..125.0).contains(&distance), "got {distance}");
    }

    #[test]
    fn warsaw_to_london_is_roughly_1450km() {
        let warsaw = LatLon::new(52.2297, 21.0122).unwrap();
        let london = LatLon::new(51.5074, -0.1278).unwrap();
        let distance_km = haversine_meters(warsaw, london) / 1000.0;
        assert!((1400.0..1500.0).contains(&distance_km), "got {distance_km}");
    }

    proptest::proptest! {
        #[test]
        fn distance_is_symmetric(lat1 in -89.0f64..89.0, lon1 in -179.0f64..179.0,
            lat2 in -89.0f64..89.0, lon2 in -179.0f64..179.0) {
            let a = LatLon::new(lat1, lon1).unwrap();
            let b = LatLon::new(lat2, lon2).unwrap();
            let forward = haversine_meters(a, b);
            let backward = haversine_meters(b, a);
            proptest::prop_assert!((forward - backward).abs() < 1e-6);
        }
    }
}
