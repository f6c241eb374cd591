use crate::math::vector::Vector3;
use crate::prelude::{GeoError, GeoResult};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// Determinants smaller than this are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Row-major 3x3 matrix.
///
/// The rotation builders return orthonormal matrices, but sums and scalings
/// (as used by the orientation smoothing) generally do not stay rotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3x3 {
    values: [f64; 9],
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3x3 {
    pub const SIZE: usize = 9;

    pub const fn from_row_major(values: [f64; 9]) -> Self {
        Self { values }
    }

    pub const fn zero() -> Self {
        Self { values: [0.0; 9] }
    }

    pub const fn identity() -> Self {
        Self::from_row_major([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    pub fn from_rows(r0: Vector3, r1: Vector3, r2: Vector3) -> Self {
        Self::from_row_major([r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z])
    }

    pub fn from_columns(c0: Vector3, c1: Vector3, c2: Vector3) -> Self {
        Self::from_rows(c0, c1, c2).transpose()
    }

    /// Rotation of `angle` radians about the X axis.
    pub fn x_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_row_major([1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c])
    }

    /// Rotation of `angle` radians about the Y axis.
    pub fn y_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_row_major([c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c])
    }

    /// Rotation of `angle` radians about the Z axis.
    pub fn z_rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_row_major([c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0])
    }

    pub fn scale(factor: f64) -> Self {
        Self::from_row_major([factor, 0.0, 0.0, 0.0, factor, 0.0, 0.0, 0.0, factor])
    }

    /// View basis for a camera at `camera` looking at `object`, with world up
    /// along +Y. Rows are right, up and the reversed viewing direction.
    pub fn look_at(camera: Vector3, object: Vector3) -> GeoResult<Self> {
        let dir = (camera - object).normalize()?;
        let right = Vector3::UNIT_Y.cross(dir).normalize()?;
        let up = dir.cross(right).normalize()?;
        Ok(Self::from_rows(right, up, dir))
    }

    pub fn as_array(&self) -> [f64; 9] {
        self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * 3 + column]
    }

    pub fn row(&self, row: usize) -> Vector3 {
        Vector3::new(self.get(row, 0), self.get(row, 1), self.get(row, 2))
    }

    pub fn column(&self, column: usize) -> Vector3 {
        Vector3::new(self.get(0, column), self.get(1, column), self.get(2, column))
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.values;
        m[0] * m[4] * m[8] - m[0] * m[5] * m[7] - m[1] * m[3] * m[8]
            + m[1] * m[5] * m[6]
            + m[2] * m[3] * m[7]
            - m[2] * m[4] * m[6]
    }

    /// Transpose of the cofactor matrix.
    pub fn adjugate(&self) -> Self {
        let [a11, a12, a13, a21, a22, a23, a31, a32, a33] = self.values;
        Self::from_row_major([
            minor(a22, a23, a32, a33),
            minor(a13, a12, a33, a32),
            minor(a12, a13, a22, a23),
            minor(a23, a21, a33, a31),
            minor(a11, a13, a31, a33),
            minor(a13, a11, a23, a21),
            minor(a21, a22, a31, a32),
            minor(a12, a11, a32, a31),
            minor(a11, a12, a21, a22),
        ])
    }

    /// `adjugate / determinant`; singular input is an error instead of inf.
    pub fn inverse(&self) -> GeoResult<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(GeoError::Degenerate(format!(
                "matrix is singular (determinant {det:e})"
            )));
        }
        Ok(self.adjugate() * (1.0 / det))
    }

    pub fn transpose(&self) -> Self {
        let m = &self.values;
        Self::from_row_major([m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]])
    }

    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((3, 3), |(r, c)| self.get(r, c))
    }

    pub fn from_array2(view: ArrayView2<f64>) -> GeoResult<Self> {
        if view.dim() != (3, 3) {
            return Err(GeoError::InvalidInput(format!(
                "expected a 3x3 array, got {:?}",
                view.dim()
            )));
        }
        let mut values = [0.0; 9];
        for (slot, value) in values.iter_mut().zip(view.iter()) {
            *slot = *value;
        }
        Ok(Self::from_row_major(values))
    }

    pub fn max_abs_difference(&self, other: &Matrix3x3) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

fn minor(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a * d - b * c
}

impl Mul for Matrix3x3 {
    type Output = Matrix3x3;

    fn mul(self, rhs: Matrix3x3) -> Matrix3x3 {
        let mut out = [0.0; 9];
        for r in 0..3 {
            for c in 0..3 {
                out[r * 3 + c] = (0..3).map(|k| self.get(r, k) * rhs.get(k, c)).sum();
            }
        }
        Matrix3x3::from_row_major(out)
    }
}

impl Mul<Vector3> for Matrix3x3 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        Vector3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

impl Mul<f64> for Matrix3x3 {
    type Output = Matrix3x3;

    fn mul(self, factor: f64) -> Matrix3x3 {
        Matrix3x3::from_row_major(self.values.map(|v| v * factor))
    }
}

impl Add for Matrix3x3 {
    type Output = Matrix3x3;

    fn add(mut self, rhs: Matrix3x3) -> Matrix3x3 {
        self += rhs;
        self
    }
}

impl AddAssign for Matrix3x3 {
    fn add_assign(&mut self, rhs: Matrix3x3) {
        for (lhs, rhs) in self.values.iter_mut().zip(rhs.values.iter()) {
            *lhs += rhs;
        }
    }
}

impl Sum for Matrix3x3 {
    fn sum<I: Iterator<Item = Matrix3x3>>(iter: I) -> Self {
        iter.fold(Matrix3x3::zero(), |acc, m| acc + m)
    }
}
