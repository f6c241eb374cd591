pub mod display;
pub mod field;
pub mod gesture;

pub use display::{bearing_label, Radar, RADAR_ORIGIN, RADAR_RADIUS};
pub use field::{FieldOfVision, DEFAULT_VIEW_ANGLE_DEG};
pub use gesture::{FlingGesture, GestureThresholds, RangeChange};
