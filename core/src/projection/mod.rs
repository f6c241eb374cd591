pub mod camera;

pub use camera::{ProjectionCamera, DEFAULT_FIELD_OF_VIEW_DEG};
