//! Synthetic device poses, used to replay sensor streams without hardware.

use crate::math::Vector3;
use crate::orientation::fusion::STANDARD_GRAVITY;
use serde::{Deserialize, Serialize};

/// Mid-latitude field strength in µT as (horizontal, downward) components.
pub const REFERENCE_FIELD_UT: (f64, f64) = (22.0, 42.0);

/// A device held in landscape with its camera facing `heading_deg` (true,
/// clockwise from north) and tilted up by `pitch_deg`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevicePose {
    pub heading_deg: f64,
    #[serde(default)]
    pub pitch_deg: f64,
}

/// Accelerometer and magnetometer readings in device axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReadings {
    pub accelerometer: Vector3,
    pub magnetometer: Vector3,
}

impl DevicePose {
    pub fn new(heading_deg: f64, pitch_deg: f64) -> Self {
        Self {
            heading_deg,
            pitch_deg,
        }
    }

    /// Device x, y and z axes expressed in east/north/up world coordinates.
    pub fn device_axes(&self) -> [Vector3; 3] {
        let (sin_h, cos_h) = self.heading_deg.to_radians().sin_cos();
        let (sin_p, cos_p) = self.pitch_deg.to_radians().sin_cos();

        let view = Vector3::new(sin_h * cos_p, cos_h * cos_p, sin_p);
        let x = Vector3::new(-sin_h * sin_p, -cos_h * sin_p, cos_p);
        let z = -view;
        let y = z.cross(x);
        [x, y, z]
    }

    /// Readings of a still device in a field whose horizontal component
    /// points `declination_deg` east of true north and dips downwards.
    pub fn readings(&self, declination_deg: f64, horizontal_ut: f64, vertical_ut: f64) -> SensorReadings {
        let (sin_d, cos_d) = declination_deg.to_radians().sin_cos();
        let field = Vector3::new(horizontal_ut * sin_d, horizontal_ut * cos_d, -vertical_ut);
        let gravity = Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
        let [x, y, z] = self.device_axes();
        let project = |w: Vector3| Vector3::new(w.dot(x), w.dot(y), w.dot(z));
        SensorReadings {
            accelerometer: project(gravity),
            magnetometer: project(field),
        }
    }

    pub fn reference_readings(&self, declination_deg: f64) -> SensorReadings {
        self.readings(declination_deg, REFERENCE_FIELD_UT.0, REFERENCE_FIELD_UT.1)
    }
}
