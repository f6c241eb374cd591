//! Shared error type and the lifecycle contract for sensor-driven stages.

pub use crate::geo::{GeoPosition, GeoReference};
pub use crate::math::{Matrix3x3, Vector3};
pub use crate::orientation::{OrientationFilter, SampleOutcome, SensorKind, SensorSample};
pub use crate::poi::{PoiGroup, PoiModel, PointOfInterest, SimplePoi};
pub use crate::projection::ProjectionCamera;
pub use crate::radar::Radar;

/// Common error type for the geometry and orientation pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// The computation would divide by zero or has no defined direction.
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
    #[error("no device location available")]
    MissingLocation,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type GeoResult<T> = Result<T, GeoError>;

/// Trait describing components that are fed by a platform sensor callback
/// between a resume and a pause.
pub trait SensorStage {
    type Sample;
    type Output;

    /// Subscribe and reset any per-session state.
    fn resume(&mut self);
    fn process(&mut self, sample: Self::Sample) -> Self::Output;
    /// Unsubscribe and drop per-session state.
    fn pause(&mut self);
    fn is_active(&self) -> bool;
}
