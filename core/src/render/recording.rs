use crate::render::canvas::{Canvas, Paint, Rect};
use serde::{Deserialize, Serialize};

/// 2D affine transform `[a c e; b d f]` mapping local to device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// `self * other`: `other` is applied first.
    pub fn then_local(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Transform {
        Transform {
            e: dx,
            f: dy,
            ..Transform::IDENTITY
        }
    }

    pub fn rotation(degrees: f64) -> Transform {
        let (s, c) = degrees.to_radians().sin_cos();
        Transform {
            a: c,
            b: s,
            c: -s,
            d: c,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation component in radians, assuming no shear or mirroring.
    pub fn angle(&self) -> f64 {
        self.b.atan2(self.a)
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.e, self.f)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Circle { cx: f64, cy: f64, radius: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    RoundRect { rect: Rect, rx: f64, ry: f64 },
    Text { text: String, x: f64, y: f64 },
}

/// One primitive in local coordinates plus the transform active when it was
/// issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub transform: Transform,
    pub shape: Shape,
    pub paint: Paint,
}

/// Canvas that records primitives instead of rasterising them, so a frame
/// can be inspected in tests or shipped to a viewer.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    current: Transform,
    stack: Vec<Transform>,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            current: Transform::IDENTITY,
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn current_transform(&self) -> Transform {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn push(&mut self, shape: Shape, paint: &Paint) {
        self.commands.push(DrawCommand {
            transform: self.current,
            shape,
            paint: *paint,
        });
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Unbalanced restores fall back to the identity transform.
    fn restore(&mut self) {
        self.current = self.stack.pop().unwrap_or(Transform::IDENTITY);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.current = self.current.then_local(&Transform::translation(dx, dy));
    }

    fn rotate(&mut self, degrees: f64) {
        self.current = self.current.then_local(&Transform::rotation(degrees));
    }

    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, paint: &Paint) {
        self.push(Shape::Circle { cx, cy, radius }, paint);
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, paint: &Paint) {
        self.push(Shape::Line { x1, y1, x2, y2 }, paint);
    }

    fn draw_round_rect(&mut self, rect: Rect, rx: f64, ry: f64, paint: &Paint) {
        self.push(Shape::RoundRect { rect, rx, ry }, paint);
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, paint: &Paint) {
        self.push(
            Shape::Text {
                text: text.to_owned(),
                x,
                y,
            },
            paint,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn translate_then_rotate_applies_rotation_first() {
        let mut canvas = RecordingCanvas::new(100, 100);
        canvas.translate(10.0, 20.0);
        canvas.rotate(90.0);
        let (x, y) = canvas.current_transform().apply(1.0, 0.0);
        // +90 degrees turns screen +x into screen +y (clockwise, y down)
        assert_abs_diff_eq!(x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 21.0, epsilon = 1e-12);
    }

    #[test]
    fn restore_returns_to_saved_transform() {
        let mut canvas = RecordingCanvas::new(100, 100);
        canvas.translate(5.0, 5.0);
        canvas.save();
        canvas.rotate(30.0);
        canvas.translate(1.0, 2.0);
        canvas.restore();
        assert_eq!(canvas.current_transform(), Transform::translation(5.0, 5.0));
        assert_eq!(canvas.depth(), 0);
        canvas.restore();
        assert_eq!(canvas.current_transform(), Transform::IDENTITY);
    }

    #[test]
    fn commands_capture_the_active_transform() {
        let mut canvas = RecordingCanvas::new(100, 100);
        canvas.save();
        canvas.translate(3.0, 4.0);
        canvas.draw_circle(0.0, 0.0, 2.0, &Paint::default());
        canvas.restore();
        canvas.draw_text("N", 1.0, 1.0, &Paint::default());

        let commands = canvas.take_commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].transform.offset(), (3.0, 4.0));
        assert_eq!(commands[1].transform, Transform::IDENTITY);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn draw_commands_serialize_with_shape_tag() {
        let command = DrawCommand {
            transform: Transform::IDENTITY,
            shape: Shape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0,
            },
            paint: Paint::default(),
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(json["shape"]["kind"], "line");
    }
}
