use crate::math::matrix::Matrix3x3;
use crate::prelude::{GeoError, GeoResult};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Position or direction in the device-relative world frame.
///
/// Axes follow the overlay convention: `x` east, `y` up, `z` south, so a
/// point straight ahead of a camera facing north has a negative `z`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const UNIT_X: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(values: [f64; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Unit vector in the same direction.
    ///
    /// A zero (or non-finite) length has no direction and is reported as
    /// degenerate rather than yielding NaN components.
    pub fn normalize(self) -> GeoResult<Self> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(GeoError::Degenerate(format!(
                "cannot normalize vector of length {length}"
            )));
        }
        Ok(self / length)
    }

    pub fn dot(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// `matrix * self`, treating the vector as a column.
    pub fn transformed(self, matrix: &Matrix3x3) -> Vector3 {
        *matrix * self
    }

    /// Bit-exact comparison, so `-0.0` and `0.0` differ and NaN equals NaN.
    pub fn bitwise_eq(self, other: Vector3) -> bool {
        self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
            && self.z.to_bits() == other.z.to_bits()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, scale: f64) -> Vector3 {
        Vector3::new(self.x * scale, self.y * scale, self.z * scale)
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, divisor: f64) -> Vector3 {
        Vector3::new(self.x / divisor, self.y / divisor, self.z / divisor)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cross_of_unit_axes_follows_right_hand_rule() {
        assert_eq!(Vector3::UNIT_X.cross(Vector3::UNIT_Y), Vector3::UNIT_Z);
        assert_eq!(Vector3::UNIT_Y.cross(Vector3::UNIT_Z), Vector3::UNIT_X);
        assert_eq!(Vector3::UNIT_Z.cross(Vector3::UNIT_X), Vector3::UNIT_Y);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let unit = Vector3::new(3.0, 0.0, -4.0).normalize().unwrap();
        assert_abs_diff_eq!(unit.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(unit.x, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(unit.z, -0.8, epsilon = 1e-12);
    }

    #[test]
    fn normalize_rejects_zero_vector() {
        let err = Vector3::ZERO.normalize().unwrap_err();
        assert!(matches!(err, GeoError::Degenerate(_)));
    }

    #[test]
    fn arithmetic_operators_compose() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        v += Vector3::new(1.0, 1.0, 1.0);
        v -= Vector3::new(0.0, 0.0, 4.0);
        assert_eq!(v, Vector3::new(2.0, 3.0, 0.0));
        assert_eq!(-v * 2.0, Vector3::new(-4.0, -6.0, 0.0));
        assert_eq!(v.dot(Vector3::new(1.0, 1.0, 1.0)), 5.0);
    }

    #[test]
    fn bitwise_equality_distinguishes_signed_zero() {
        let a = Vector3::new(0.0, 1.0, 2.0);
        let b = Vector3::new(-0.0, 1.0, 2.0);
        assert_eq!(a, b);
        assert!(!a.bitwise_eq(b));
        assert!(a.bitwise_eq(a));
    }
}
