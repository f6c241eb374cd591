//! Backend-neutral 2D drawing surface used by the POI markers and the radar.

pub mod canvas;
pub mod recording;

pub use canvas::{Canvas, Color, FontMetrics, Paint, Rect, Style};
pub use recording::{DrawCommand, RecordingCanvas, Shape, Transform};
