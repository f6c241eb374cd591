use crate::prelude::{GeoError, GeoResult};

/// Signed angle in degrees of the segment `center -> point`, measured from
/// the positive x axis, in (-180, 180].
///
/// Coincident points have no direction and are reported as degenerate.
pub fn planar_angle(center: (f64, f64), point: (f64, f64)) -> GeoResult<f64> {
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    if dx == 0.0 && dy == 0.0 {
        return Err(GeoError::Degenerate(
            "angle between coincident points".into(),
        ));
    }
    Ok(dy.atan2(dx).to_degrees())
}

/// Strict containment: points on the rectangle edge are outside.
pub fn point_inside(x: f64, y: f64, rect_x: f64, rect_y: f64, width: f64, height: f64) -> bool {
    x > rect_x && x < rect_x + width && y > rect_y && y < rect_y + height
}

/// Human-readable distance: whole metres below one kilometre, whole
/// kilometres above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0}m", meters)
    } else {
        format!("{:.0}km", meters / 1000.0)
    }
}
