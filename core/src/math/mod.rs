pub mod matrix;
pub mod point;
pub mod vector;

pub use matrix::Matrix3x3;
pub use vector::Vector3;
