use crate::math::Matrix3x3;
use crate::prelude::{GeoError, GeoResult};
use serde::{Deserialize, Serialize};

/// A signed device axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceAxis {
    X,
    Y,
    Z,
    MinusX,
    MinusY,
    MinusZ,
}

impl DeviceAxis {
    pub const ALL: [DeviceAxis; 6] = [
        DeviceAxis::X,
        DeviceAxis::Y,
        DeviceAxis::Z,
        DeviceAxis::MinusX,
        DeviceAxis::MinusY,
        DeviceAxis::MinusZ,
    ];

    pub fn index(self) -> usize {
        match self {
            DeviceAxis::X | DeviceAxis::MinusX => 0,
            DeviceAxis::Y | DeviceAxis::MinusY => 1,
            DeviceAxis::Z | DeviceAxis::MinusZ => 2,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            DeviceAxis::X | DeviceAxis::Y | DeviceAxis::Z => 1.0,
            _ => -1.0,
        }
    }
}

/// Re-expresses a rotation matrix in a frame whose X and Y axes are the
/// given device axes. The third axis is implied, with its sign chosen so the
/// result is still a proper rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRemap {
    x: DeviceAxis,
    y: DeviceAxis,
}

impl AxisRemap {
    /// X stays X, Z becomes -Y: the camera looks out of the back of the
    /// device instead of down its long edge.
    pub const CAMERA_FACING: AxisRemap = AxisRemap {
        x: DeviceAxis::X,
        y: DeviceAxis::MinusZ,
    };

    pub fn new(x: DeviceAxis, y: DeviceAxis) -> GeoResult<Self> {
        if x.index() == y.index() {
            return Err(GeoError::InvalidInput(format!(
                "cannot remap both X and Y onto the same axis ({x:?}, {y:?})"
            )));
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> DeviceAxis {
        self.x
    }

    pub fn y(&self) -> DeviceAxis {
        self.y
    }

    /// Signed permutation `Q` such that `remapped = raw * Q`.
    pub fn matrix(&self) -> Matrix3x3 {
        let ix = self.x.index();
        let iy = self.y.index();
        let iz = 3 - ix - iy;
        let parity = if iy == (ix + 1) % 3 { 1.0 } else { -1.0 };
        let sz = self.x.sign() * self.y.sign() * parity;

        let mut values = [0.0; 9];
        values[ix] = self.x.sign();
        values[3 + iy] = self.y.sign();
        values[6 + iz] = sz;
        Matrix3x3::from_row_major(values)
    }

    pub fn apply(&self, raw: &Matrix3x3) -> Matrix3x3 {
        *raw * self.matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn camera_facing_moves_columns() {
        let raw = Matrix3x3::from_row_major([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let out = AxisRemap::CAMERA_FACING.apply(&raw);
        assert_eq!(out.column(0), raw.column(0));
        assert_eq!(out.column(1), raw.column(2));
        assert_eq!(out.column(2), -raw.column(1));
    }

    #[test]
    fn every_valid_remap_is_a_proper_rotation() {
        let mut count = 0;
        for x in DeviceAxis::ALL {
            for y in DeviceAxis::ALL {
                if let Ok(remap) = AxisRemap::new(x, y) {
                    assert_abs_diff_eq!(remap.matrix().determinant(), 1.0);
                    count += 1;
                }
            }
        }
        assert_eq!(count, 24);
    }

    #[test]
    fn identity_remap_keeps_the_matrix() {
        let remap = AxisRemap::new(DeviceAxis::X, DeviceAxis::Y).unwrap();
        let raw = Matrix3x3::z_rotation(0.4);
        assert_eq!(remap.apply(&raw), raw);
    }

    #[test]
    fn same_axis_twice_is_rejected() {
        assert!(AxisRemap::new(DeviceAxis::Z, DeviceAxis::MinusZ).is_err());
    }

    #[test]
    fn remap_keeps_rows_unit_length() {
        let raw = Matrix3x3::x_rotation(0.7) * Matrix3x3::y_rotation(-0.3);
        let out = AxisRemap::CAMERA_FACING.apply(&raw);
        for r in 0..3 {
            assert_abs_diff_eq!(out.row(r).length(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(out.row(0).dot(out.row(1)), 0.0, epsilon = 1e-12);
    }
}
