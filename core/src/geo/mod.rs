pub mod geodesy;
pub mod magnetic;
pub mod position;
pub mod reference;

pub use geodesy::DistanceBearing;
pub use magnetic::{DipoleField, FixedDeclination, GeomagneticModel};
pub use position::GeoPosition;
pub use reference::GeoReference;
