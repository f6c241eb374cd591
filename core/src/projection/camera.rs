use crate::math::{Matrix3x3, Vector3};
use crate::prelude::{GeoError, GeoResult};

/// Horizontal field of view used when none is configured.
pub const DEFAULT_FIELD_OF_VIEW_DEG: f64 = 45.0;

/// Pinhole camera mapping camera-space vectors onto the viewport.
///
/// Screen x grows to the right and screen y grows downwards. The projected
/// `z` is the camera-space depth, kept only for visibility checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionCamera {
    width: u32,
    height: u32,
    focal_distance: f64,
    rotation: Matrix3x3,
}

impl ProjectionCamera {
    pub fn new(width: u32, height: u32) -> GeoResult<Self> {
        if width == 0 || height == 0 {
            return Err(GeoError::InvalidInput(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        let mut camera = Self {
            width,
            height,
            focal_distance: 0.0,
            rotation: Matrix3x3::identity(),
        };
        camera.set_field_of_view(DEFAULT_FIELD_OF_VIEW_DEG.to_radians())?;
        Ok(camera)
    }

    /// `focal = (width / 2) / tan(angle / 2)` for an angle in radians.
    pub fn set_field_of_view(&mut self, angle: f64) -> GeoResult<()> {
        if !(angle > 0.0 && angle < std::f64::consts::PI) {
            return Err(GeoError::InvalidInput(format!(
                "field of view must lie in (0, pi) radians, got {angle}"
            )));
        }
        self.focal_distance = self.half_width() / (angle / 2.0).tan();
        Ok(())
    }

    pub fn project(&self, point: Vector3) -> GeoResult<Vector3> {
        self.project_with_offset(point, 0.0, 0.0)
    }

    /// Projects `point` and shifts the result by `(add_x, add_y)` pixels.
    ///
    /// A point on the camera plane (`z == 0`) has no projection.
    pub fn project_with_offset(&self, point: Vector3, add_x: f64, add_y: f64) -> GeoResult<Vector3> {
        if point.z == 0.0 {
            return Err(GeoError::Degenerate(
                "cannot project a point on the camera plane".into(),
            ));
        }
        let x = self.focal_distance * point.x / -point.z;
        let y = self.focal_distance * point.y / -point.z;
        Ok(Vector3::new(
            x + add_x + self.half_width(),
            -y + add_y + self.half_height(),
            point.z,
        ))
    }

    pub fn set_rotation(&mut self, rotation: Matrix3x3) {
        self.rotation = rotation;
    }

    pub fn rotation(&self) -> &Matrix3x3 {
        &self.rotation
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn focal_distance(&self) -> f64 {
        self.focal_distance
    }

    fn half_width(&self) -> f64 {
        f64::from(self.width) / 2.0
    }

    fn half_height(&self) -> f64 {
        f64::from(self.height) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ninety_degree_view_puts_focal_at_half_width() {
        let mut camera = ProjectionCamera::new(640, 480).unwrap();
        camera.set_field_of_view(90.0_f64.to_radians()).unwrap();
        assert_abs_diff_eq!(camera.focal_distance(), 320.0, epsilon = 1e-9);
    }

    #[test]
    fn point_on_optical_axis_lands_on_screen_centre() {
        let camera = ProjectionCamera::new(801, 600).unwrap();
        let f = camera.focal_distance();
        let p = camera.project(Vector3::new(0.0, 0.0, -f)).unwrap();
        assert_eq!(p.x, 400.5);
        assert_eq!(p.y, 300.0);
        assert_eq!(p.z, -f);
    }

    #[test]
    fn screen_y_grows_downwards() {
        let camera = ProjectionCamera::new(200, 100).unwrap();
        let above = camera.project(Vector3::new(0.0, 1.0, -10.0)).unwrap();
        let right = camera.project(Vector3::new(1.0, 0.0, -10.0)).unwrap();
        assert!(above.y < 50.0);
        assert!(right.x > 100.0);
    }

    #[test]
    fn offset_shifts_projection() {
        let camera = ProjectionCamera::new(200, 100).unwrap();
        let plain = camera.project(Vector3::new(3.0, 2.0, -7.0)).unwrap();
        let shifted = camera
            .project_with_offset(Vector3::new(3.0, 2.0, -7.0), 5.0, -4.0)
            .unwrap();
        assert_abs_diff_eq!(shifted.x - plain.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shifted.y - plain.y, -4.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_depth_is_degenerate() {
        let camera = ProjectionCamera::new(200, 100).unwrap();
        let err = camera.project(Vector3::new(1.0, 1.0, 0.0)).unwrap_err();
        assert!(matches!(err, GeoError::Degenerate(_)));
    }

    #[test]
    fn invalid_view_settings_are_rejected() {
        assert!(ProjectionCamera::new(0, 100).is_err());
        let mut camera = ProjectionCamera::new(10, 10).unwrap();
        assert!(camera.set_field_of_view(0.0).is_err());
        assert!(camera.set_field_of_view(std::f64::consts::PI).is_err());
        assert!(camera.set_field_of_view(f64::NAN).is_err());
    }
}
