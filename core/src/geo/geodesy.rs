//! Great-circle helpers on a spherical Earth.

use crate::geo::position::GeoPosition;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Result of the inverse geodesic problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceBearing {
    pub distance_m: f64,
    /// Initial bearing, clockwise from true north, in [0, 360).
    pub bearing_deg: f64,
}

/// Haversine great-circle distance in metres between two lat/lon pairs.
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi * 0.5).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda * 0.5).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing in degrees, normalised to [0, 360).
pub fn initial_bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

pub fn distance_bearing(from: &GeoPosition, to: &GeoPosition) -> DistanceBearing {
    DistanceBearing {
        distance_m: distance_m(from.latitude, from.longitude, to.latitude, to.longitude),
        bearing_deg: initial_bearing_deg(from.latitude, from.longitude, to.latitude, to.longitude),
    }
}

/// Point reached after travelling `distance_m` from `start` along the great
/// circle leaving at `bearing_deg`. Altitude is carried over unchanged.
pub fn destination(start: &GeoPosition, bearing_deg: f64, distance_m: f64) -> GeoPosition {
    let theta = bearing_deg.to_radians();
    let phi1 = start.latitude.to_radians();
    let lambda1 = start.longitude.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    GeoPosition::new(phi2.to_degrees(), lambda2.to_degrees(), start.altitude)
}
