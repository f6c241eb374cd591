//! Magnetic declination sources.

use crate::geo::position::GeoPosition;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Given a location and an instant, returns the magnetic declination in
/// degrees (positive when magnetic north lies east of true north).
pub trait GeomagneticModel: Send + Sync {
    fn declination(&self, position: &GeoPosition, at: DateTime<Utc>) -> f64;
}

/// Constant declination, for tests and for regions where it is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedDeclination(pub f64);

impl GeomagneticModel for FixedDeclination {
    fn declination(&self, _position: &GeoPosition, _at: DateTime<Utc>) -> f64 {
        self.0
    }
}

/// First-degree (tilted dipole) geomagnetic field.
///
/// Coefficients are Schmidt semi-normalised Gauss coefficients in nT with
/// their secular variation in nT/year. The dipole ignores the higher-order
/// terms, so declinations can be off by several degrees; it is good enough
/// to pull the overlay towards true north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DipoleField {
    pub epoch: f64,
    pub g10: f64,
    pub g11: f64,
    pub h11: f64,
    pub g10_rate: f64,
    pub g11_rate: f64,
    pub h11_rate: f64,
}

impl Default for DipoleField {
    /// IGRF-13, epoch 2020.0.
    fn default() -> Self {
        Self {
            epoch: 2020.0,
            g10: -29_404.8,
            g11: -1_450.9,
            h11: 4_652.5,
            g10_rate: 5.7,
            g11_rate: 7.4,
            h11_rate: -25.9,
        }
    }
}

impl DipoleField {
    fn coefficients_at(&self, year: f64) -> (f64, f64, f64) {
        let dt = year - self.epoch;
        (
            self.g10 + self.g10_rate * dt,
            self.g11 + self.g11_rate * dt,
            self.h11 + self.h11_rate * dt,
        )
    }

    /// North and east field components (nT) on the reference sphere.
    pub fn horizontal_components(&self, position: &GeoPosition, year: f64) -> (f64, f64) {
        let (g10, g11, h11) = self.coefficients_at(year);
        let colatitude = (90.0 - position.latitude).to_radians();
        let longitude = position.longitude.to_radians();
        let (sin_t, cos_t) = colatitude.sin_cos();
        let (sin_l, cos_l) = longitude.sin_cos();

        let north = -g10 * sin_t + (g11 * cos_l + h11 * sin_l) * cos_t;
        let east = g11 * sin_l - h11 * cos_l;
        (north, east)
    }
}

impl GeomagneticModel for DipoleField {
    fn declination(&self, position: &GeoPosition, at: DateTime<Utc>) -> f64 {
        let (north, east) = self.horizontal_components(position, decimal_year(at));
        east.atan2(north).to_degrees()
    }
}

pub fn decimal_year(at: DateTime<Utc>) -> f64 {
    let days_in_year = if at.date_naive().leap_year() { 366.0 } else { 365.0 };
    at.year() as f64 + at.ordinal0() as f64 / days_in_year
}
