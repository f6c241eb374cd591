use geoarcore::geo::geodesy::destination;
use geoarcore::geo::GeoPosition;
use geoarcore::poi::{PoiGroup, PointOfInterest};

/// Ring of `count` waypoints at `radius_m` around `centre`, the first one
/// due north and the rest evenly spaced clockwise.
pub fn demo_ring(centre: &GeoPosition, count: usize, radius_m: f64) -> PoiGroup {
    let mut group = PoiGroup::new("Demo ring", "Waypoints generated around the device");
    let step = 360.0 / count.max(1) as f64;
    for index in 0..count {
        let bearing = step * index as f64;
        let spot = destination(centre, bearing, radius_m);
        let mut point = PointOfInterest::new(
            format!("Waypoint {}", index + 1),
            format!("{:.0} m at {:.0}º", radius_m, bearing),
            spot.latitude,
            spot.longitude,
            centre.altitude,
        );
        point.add_metadata("bearing", format!("{bearing:.1}"));
        group.add_point(point);
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geoarcore::geo::geodesy::distance_bearing;

    #[test]
    fn ring_points_sit_on_the_requested_circle() {
        let centre = GeoPosition::new(38.7, -9.1, 20.0);
        let ring = demo_ring(&centre, 8, 750.0);
        assert_eq!(ring.len(), 8);
        for (index, point) in ring.points().iter().enumerate() {
            let db = distance_bearing(&centre, &point.position());
            assert_abs_diff_eq!(db.distance_m, 750.0, epsilon = 1e-3);
            assert_abs_diff_eq!(db.bearing_deg, 45.0 * index as f64, epsilon = 1e-3);
            assert_eq!(point.identifier as usize, index + 1);
        }
    }
}
