use crate::geo::geodesy::{self, DistanceBearing};
use crate::geo::magnetic::{DipoleField, GeomagneticModel};
use crate::geo::position::GeoPosition;
use crate::math::point::planar_angle;
use crate::math::{Matrix3x3, Vector3};
use crate::prelude::{GeoError, GeoResult};
use chrono::{DateTime, Utc};
use std::sync::{PoisonError, RwLock};

/// Single source of truth for where the device is and which way it faces.
///
/// Sensor callbacks write the rotation while the render thread reads it, so
/// both the location and the rotation sit behind short-lived locks and are
/// copied in and out.
pub struct GeoReference {
    location: RwLock<Option<GeoPosition>>,
    rotation: RwLock<Matrix3x3>,
    magnetic: Box<dyn GeomagneticModel>,
}

impl GeoReference {
    pub fn new() -> Self {
        Self::with_model(Box::new(DipoleField::default()))
    }

    pub fn with_model(magnetic: Box<dyn GeomagneticModel>) -> Self {
        Self {
            location: RwLock::new(None),
            rotation: RwLock::new(Matrix3x3::identity()),
            magnetic,
        }
    }

    pub fn set_location(&self, position: GeoPosition) {
        *self.location.write().unwrap_or_else(PoisonError::into_inner) = Some(position);
    }

    pub fn clear_location(&self) {
        *self.location.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Last known location; absent until the provider delivers a fix.
    pub fn location(&self) -> Option<GeoPosition> {
        *self.location.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_rotation(&self, rotation: Matrix3x3) {
        *self.rotation.write().unwrap_or_else(PoisonError::into_inner) = rotation;
    }

    pub fn rotation(&self) -> Matrix3x3 {
        *self.rotation.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Compass heading in degrees, [0, 360), clockwise from true north.
    pub fn azimuth(&self) -> GeoResult<f64> {
        let looking = self.rotation().transpose() * Vector3::UNIT_X;
        let angle = planar_angle((0.0, 0.0), (looking.x, looking.z))?;
        Ok(angle.rem_euclid(360.0))
    }

    /// Camera pitch in degrees. Not clamped; the range is (-180, 180].
    pub fn pitch(&self) -> GeoResult<f64> {
        let looking = self.rotation() * Vector3::UNIT_Y;
        Ok(-planar_angle((0.0, 0.0), (looking.y, looking.z))?)
    }

    pub fn distance_bearing_to(&self, target: &GeoPosition) -> GeoResult<DistanceBearing> {
        let here = self.location().ok_or(GeoError::MissingLocation)?;
        Ok(geodesy::distance_bearing(&here, target))
    }

    /// Magnetic declination at the current location for the instant `at`.
    pub fn declination(&self, at: DateTime<Utc>) -> GeoResult<f64> {
        let here = self.location().ok_or(GeoError::MissingLocation)?;
        Ok(self.magnetic.declination(&here, at))
    }
}

impl Default for GeoReference {
    fn default() -> Self {
        Self::new()
    }
}
