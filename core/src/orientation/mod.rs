pub mod filter;
pub mod fusion;
pub mod history;
pub mod pose;
pub mod remap;

pub use filter::{
    CorrectionChain, FilterState, OrientationFilter, SampleOutcome, SensorKind, SensorSample,
};
pub use fusion::{GravityMagneticFusion, SensorFusion};
pub use history::{OrientationHistory, HISTORY_CAPACITY};
pub use pose::DevicePose;
pub use remap::{AxisRemap, DeviceAxis};
