use serde::{Deserialize, Serialize};

/// 8-bit ARGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::argb(0xff, 0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::argb(0xff, 0x00, 0x00, 0x00);
    pub const RED: Color = Color::argb(0xff, 0xff, 0x00, 0x00);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    Fill,
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Color,
    pub style: Style,
    pub stroke_width: f64,
    pub text_size: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            style: Style::Fill,
            stroke_width: 1.0,
            text_size: 12.0,
        }
    }
}

impl Paint {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_text_size(mut self, size: f64) -> Self {
        self.text_size = size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Vertical font extents, both positive, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub ascent: f64,
    pub descent: f64,
}

impl FontMetrics {
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Drawing surface with a save/restore stack of translate/rotate transforms.
///
/// Angles are in degrees, clockwise on screen, as the overlay code works in
/// compass bearings.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, degrees: f64);

    fn draw_circle(&mut self, cx: f64, cy: f64, radius: f64, paint: &Paint);
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, paint: &Paint);
    fn draw_round_rect(&mut self, rect: Rect, rx: f64, ry: f64, paint: &Paint);
    /// Draws `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, paint: &Paint);

    /// Advance width of `text`. The default assumes a proportional sans font.
    fn measure_text(&self, text: &str, paint: &Paint) -> f64 {
        text.chars().count() as f64 * paint.text_size * 0.55
    }

    fn font_metrics(&self, paint: &Paint) -> FontMetrics {
        FontMetrics {
            ascent: paint.text_size * 0.928,
            descent: paint.text_size * 0.244,
        }
    }
}
