use crate::render::{Canvas, Color, Paint, Rect, Style};

pub const LABEL_MAX_WIDTH: f64 = 160.0;
pub const LABEL_TEXT_SIZE: f64 = 14.0;
const LABEL_CORNER_RADIUS: f64 = 5.0;
const LABEL_BACKGROUND: Color = Color::argb(100, 0xcc, 0xcc, 0xcc);

/// Word-wrapped text box drawn under a POI marker.
///
/// The local origin is the top-left corner of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    lines: Vec<String>,
    pad: f64,
    ascent: f64,
    line_height: f64,
    width: f64,
    height: f64,
}

impl TextBlock {
    /// Lays `text` out for `canvas`, breaking between words so that no line
    /// is wider than `max_width` minus the padding on both sides. A single
    /// word wider than that keeps its own line.
    pub fn layout(text: &str, max_width: f64, canvas: &dyn Canvas) -> Self {
        let paint = Self::text_paint();
        let metrics = canvas.font_metrics(&paint);
        let pad = metrics.ascent / 2.0;
        let area_width = max_width - pad * 2.0;

        let mut lines = Vec::new();
        let mut start = 0;
        let mut prev_end = 0;
        for end in word_boundaries(text) {
            let candidate = &text[start..end];
            if canvas.measure_text(candidate, &paint) > area_width && prev_end > start {
                let line = text[start..prev_end].trim();
                if !line.is_empty() {
                    lines.push(line.to_owned());
                }
                start = prev_end;
            }
            prev_end = end;
        }
        lines.push(text[start..].trim().to_owned());

        let widest = lines
            .iter()
            .map(|line| canvas.measure_text(line, &paint))
            .fold(0.0, f64::max);
        let line_height = metrics.line_height();

        Self {
            pad,
            ascent: metrics.ascent,
            line_height,
            width: widest + pad * 2.0,
            height: line_height * lines.len() as f64 + pad * 2.0,
            lines,
        }
    }

    fn text_paint() -> Paint {
        Paint::default()
            .with_color(Color::WHITE)
            .with_style(Style::Fill)
            .with_text_size(LABEL_TEXT_SIZE)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let background = Paint::default()
            .with_color(LABEL_BACKGROUND)
            .with_style(Style::Fill);
        canvas.draw_round_rect(
            Rect::new(0.0, 0.0, self.width, self.height),
            LABEL_CORNER_RADIUS,
            LABEL_CORNER_RADIUS,
            &background,
        );

        let paint = Self::text_paint();
        for (i, line) in self.lines.iter().enumerate() {
            let baseline = self.pad + self.line_height * i as f64 + self.ascent;
            canvas.draw_text(line, self.pad, baseline, &paint);
        }
    }
}

/// Byte offsets where a run of whitespace starts or ends, plus the end of
/// the text.
fn word_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = Vec::new();
    let mut previous: Option<bool> = None;
    for (index, ch) in text.char_indices() {
        let blank = ch.is_whitespace();
        if previous.is_some_and(|p| p != blank) {
            boundaries.push(index);
        }
        previous = Some(blank);
    }
    boundaries.push(text.len());
    boundaries
}
