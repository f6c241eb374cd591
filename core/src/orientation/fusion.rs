use crate::math::{Matrix3x3, Vector3};

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.806_65;

/// Derives a raw device rotation from one accelerometer and one
/// magnetometer reading, or `None` when the pair does not determine one.
pub trait SensorFusion: Send {
    fn rotation_matrix(&self, gravity: Vector3, geomagnetic: Vector3) -> Option<Matrix3x3>;
}

/// Gravity/magnetic-field triad.
///
/// The rows of the result are East, North and Up expressed in device axes,
/// so the matrix maps device coordinates to world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityMagneticFusion {
    /// Below this squared magnitude the device is considered in free fall.
    pub min_gravity_squared: f64,
    /// Minimum magnitude of `field x gravity` before normalisation.
    pub min_horizontal_field: f64,
}

impl Default for GravityMagneticFusion {
    fn default() -> Self {
        Self {
            min_gravity_squared: 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY,
            min_horizontal_field: 0.1,
        }
    }
}

impl SensorFusion for GravityMagneticFusion {
    fn rotation_matrix(&self, gravity: Vector3, geomagnetic: Vector3) -> Option<Matrix3x3> {
        if gravity.length_squared() < self.min_gravity_squared {
            return None;
        }

        let east = geomagnetic.cross(gravity);
        if east.length() < self.min_horizontal_field {
            // magnetometer parallel to gravity: near a magnetic pole or bad data
            return None;
        }

        let east = east.normalize().ok()?;
        let up = gravity.normalize().ok()?;
        let north = up.cross(east);
        Some(Matrix3x3::from_rows(east, north, up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flat_device_pointing_north_is_identity() {
        // screen up, top edge north: gravity reaction on +z, field north and down
        let gravity = Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
        let field = Vector3::new(0.0, 22.0, -40.0);
        let r = GravityMagneticFusion::default()
            .rotation_matrix(gravity, field)
            .unwrap();
        assert!(r.max_abs_difference(&Matrix3x3::identity()) < 1e-12);
    }

    #[test]
    fn result_is_orthonormal_for_tilted_input() {
        let r = GravityMagneticFusion::default()
            .rotation_matrix(Vector3::new(1.2, 3.4, 8.9), Vector3::new(-12.0, 30.0, -25.0))
            .unwrap();
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        let should_be_identity = r * r.transpose();
        assert!(should_be_identity.max_abs_difference(&Matrix3x3::identity()) < 1e-12);
    }

    #[test]
    fn free_fall_is_insufficient() {
        let fusion = GravityMagneticFusion::default();
        assert!(fusion
            .rotation_matrix(Vector3::new(0.0, 0.1, 0.2), Vector3::new(0.0, 20.0, -40.0))
            .is_none());
    }

    #[test]
    fn field_parallel_to_gravity_is_insufficient() {
        let fusion = GravityMagneticFusion::default();
        assert!(fusion
            .rotation_matrix(Vector3::new(0.0, 0.0, 9.8), Vector3::new(0.0, 0.0, -50.0))
            .is_none());
        assert!(fusion
            .rotation_matrix(Vector3::new(0.0, 0.0, 9.8), Vector3::ZERO)
            .is_none());
    }
}
