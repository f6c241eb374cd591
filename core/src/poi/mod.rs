pub mod label;
pub mod model;
pub mod simple;

pub use label::TextBlock;
pub use model::{vector_to_location, PoiGroup, PointOfInterest};
pub use simple::{PoiModel, SimplePoi, CENTRE_STRIP_HALF_WIDTH};
