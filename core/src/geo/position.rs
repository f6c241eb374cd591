use serde::{Deserialize, Serialize};
use std::fmt;

/// A location fix as delivered by the location provider. Latitude and
/// longitude are in degrees, altitude in metres; ranges are not validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
}

impl GeoPosition {
    pub const fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

impl fmt::Display for GeoPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}, {:.1}m)",
            self.latitude, self.longitude, self.altitude
        )
    }
}
