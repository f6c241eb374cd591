//! Geo-referenced orientation, projection and radar core for an AR
//! point-of-interest overlay.
//!
//! Raw accelerometer and magnetometer samples are fused into a smoothed
//! world-to-camera rotation, GPS positions are turned into local tangent-plane
//! vectors, and both meet in a pinhole projection that places POI markers and
//! a top-down radar on any [`render::Canvas`].

pub mod config;
pub mod geo;
pub mod math;
pub mod orientation;
pub mod overlay;
pub mod poi;
pub mod prelude;
pub mod projection;
pub mod radar;
pub mod render;
pub mod telemetry;

pub use config::OverlayConfig;
pub use overlay::{FrameReport, PoiOverlay};
pub use prelude::{GeoError, GeoResult, SensorStage};
