use crate::math::point::format_distance;
use crate::math::Vector3;
use crate::poi::PoiModel;
use crate::prelude::{GeoError, GeoResult};
use crate::radar::field::{FieldOfVision, DEFAULT_VIEW_ANGLE_DEG};
use crate::radar::gesture::{FlingGesture, GestureThresholds, RangeChange};
use crate::render::{Canvas, Color, Paint, Rect, Style};
use crate::telemetry::LogManager;

/// Radar radius in pixels.
pub const RADAR_RADIUS: f64 = 40.0;
/// Top-left corner of the radar's bounding square on screen.
pub const RADAR_ORIGIN: (f64, f64) = (10.0, 20.0);

const BEARING_NAMES: [&str; 16] = [
    "N", "NE", "NE", "E", "E", "SE", "SE", "S", "S", "SW", "SW", "W", "W", "NW", "NW", "N",
];
const BLIP_RADIUS: f64 = 1.5;
const FACE_COLOR: Color = Color::argb(100, 0xcc, 0xcc, 0xcc);
const RING_COLOR: Color = Color::argb(0x88, 0x22, 0x22, 0x22);
const LINE_COLOR: Color = Color::argb(0xff, 0x22, 0x22, 0x22);
const LABEL_TEXT_SIZE: f64 = 12.0;
const BEARING_BOX_Y: f64 = 15.0;

/// "<bearing>º <compass point>", e.g. "90º E". The bearing is rounded to
/// whole degrees in [0, 360) before the sector is picked.
pub fn bearing_label(bearing: f64) -> String {
    let degrees = bearing.round().rem_euclid(360.0);
    let sector = (degrees / (360.0 / 16.0)).floor() as usize;
    format!("{:.0}º {}", degrees, BEARING_NAMES[sector % 16])
}

/// Top-down view of nearby POIs, turned so the device heading points up.
#[derive(Debug, Clone)]
pub struct Radar {
    range_m: f64,
    left: FieldOfVision,
    right: FieldOfVision,
    logger: LogManager,
}

impl Radar {
    pub fn new(range_km: f64) -> GeoResult<Self> {
        let centre = (RADAR_ORIGIN.0 + RADAR_RADIUS, RADAR_ORIGIN.1 + RADAR_RADIUS);
        let mut left = FieldOfVision::new(0.0, -RADAR_RADIUS);
        let mut right = FieldOfVision::new(0.0, -RADAR_RADIUS);
        left.rotate(-DEFAULT_VIEW_ANGLE_DEG / 2.0);
        right.rotate(DEFAULT_VIEW_ANGLE_DEG / 2.0);
        left.add(centre.0, centre.1);
        right.add(centre.0, centre.1);

        let mut radar = Self {
            range_m: 0.0,
            left,
            right,
            logger: LogManager::new("radar"),
        };
        radar.set_range(range_km)?;
        Ok(radar)
    }

    pub fn set_range(&mut self, range_km: f64) -> GeoResult<()> {
        if !(range_km > 0.0 && range_km.is_finite()) {
            return Err(GeoError::InvalidInput(format!(
                "radar range must be positive, got {range_km} km"
            )));
        }
        self.range_m = range_km * 1000.0;
        Ok(())
    }

    /// Range in metres.
    pub fn range(&self) -> f64 {
        self.range_m
    }

    pub fn range_in_kilometers(&self) -> f64 {
        self.range_m / 1000.0
    }

    pub fn width(&self) -> f64 {
        RADAR_RADIUS * 2.0
    }

    pub fn height(&self) -> f64 {
        RADAR_RADIUS * 2.0
    }

    pub fn field_of_vision(&self) -> (&FieldOfVision, &FieldOfVision) {
        (&self.left, &self.right)
    }

    /// Radar-local position of a world vector, or `None` when it falls
    /// outside the face. A vector exactly at the device is treated as not
    /// yet computed and skipped.
    pub fn blip(&self, world: Vector3) -> Option<(f64, f64)> {
        let scale = self.range_m / RADAR_RADIUS;
        let x = world.x / scale;
        let y = world.z / scale;
        let distance = x * x + y * y;
        (distance != 0.0 && distance < RADAR_RADIUS * RADAR_RADIUS)
            .then_some((x + RADAR_RADIUS, y + RADAR_RADIUS))
    }

    pub fn paint(&self, canvas: &mut dyn Canvas, bearing: f64, pois: &[Box<dyn PoiModel>]) {
        canvas.save();
        canvas.translate(
            RADAR_ORIGIN.0 + self.width() / 2.0,
            RADAR_ORIGIN.1 + self.height() / 2.0,
        );
        canvas.rotate(-bearing);
        canvas.translate(-self.width() / 2.0, -self.height() / 2.0);

        let face = Paint::default().with_color(FACE_COLOR).with_style(Style::Fill);
        canvas.draw_circle(RADAR_RADIUS, RADAR_RADIUS, RADAR_RADIUS, &face);

        let ring = Paint::default().with_color(RING_COLOR).with_style(Style::Stroke);
        for radius in [RADAR_RADIUS, RADAR_RADIUS / 1.5, RADAR_RADIUS / 2.5] {
            canvas.draw_circle(RADAR_RADIUS, RADAR_RADIUS, radius, &ring);
        }

        let blip = Paint::default().with_color(Color::RED).with_style(Style::Fill);
        for (x, y) in pois.iter().filter_map(|poi| self.blip(poi.world_position())) {
            canvas.draw_circle(x, y, BLIP_RADIUS, &blip);
        }
        canvas.restore();

        self.draw_extras(canvas, bearing);
    }

    fn draw_extras(&self, canvas: &mut dyn Canvas, bearing: f64) {
        let text_paint = Paint::default()
            .with_color(Color::WHITE)
            .with_style(Style::Fill)
            .with_text_size(LABEL_TEXT_SIZE);
        let metrics = canvas.font_metrics(&text_paint);
        let box_height = metrics.ascent + metrics.descent + 4.0;

        let range_text = format_distance(self.range_m);
        let range_width = canvas.measure_text(&range_text, &text_paint) + 8.0;
        canvas.draw_text(
            &range_text,
            4.0 + 15.0 + RADAR_RADIUS - range_width / 2.0,
            2.0 + metrics.ascent + 10.0 + RADAR_RADIUS * 2.0 - box_height / 2.0,
            &text_paint,
        );

        let centre = (RADAR_ORIGIN.0 + RADAR_RADIUS, RADAR_ORIGIN.1 + RADAR_RADIUS);
        let line = Paint::default().with_color(LINE_COLOR).with_style(Style::Stroke);
        for edge in [&self.left, &self.right] {
            let (x, y) = edge.tip();
            canvas.draw_line(x, y, centre.0, centre.1, &line);
        }

        let text = bearing_label(bearing);
        let x = RADAR_ORIGIN.0 + RADAR_RADIUS;
        let width = canvas.measure_text(&text, &text_paint) + 8.0;
        let rect = Rect::new(
            x - width / 2.0,
            BEARING_BOX_Y - box_height / 2.0,
            x + width / 2.0,
            BEARING_BOX_Y + box_height / 2.0,
        );
        let fill = Paint::default().with_color(Color::BLACK).with_style(Style::Fill);
        let border = Paint::default().with_color(Color::WHITE).with_style(Style::Stroke);
        canvas.draw_round_rect(rect, 5.0, 5.0, &fill);
        canvas.draw_round_rect(rect, 5.0, 5.0, &border);
        canvas.draw_text(
            &text,
            4.0 + rect.left,
            2.0 + metrics.ascent + rect.top,
            &text_paint,
        );
    }

    /// Applies a fling to the range. Returns `false` when the fling was not
    /// a horizontal swipe, `true` otherwise (even if the range is unchanged).
    pub fn on_fling(&mut self, fling: &FlingGesture, thresholds: &GestureThresholds) -> bool {
        if !fling.is_horizontal_swipe(thresholds) {
            return false;
        }
        if let Some(change) = fling.range_change(thresholds) {
            self.range_m = match change {
                RangeChange::Halve => self.range_m / 2.0,
                RangeChange::Double => self.range_m * 2.0,
            };
            self.logger
                .record(&format!("range now {}", format_distance(self.range_m)));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingCanvas, Shape};
    use approx::assert_abs_diff_eq;

    #[test]
    fn bearing_labels_use_sixteen_sectors() {
        assert_eq!(bearing_label(0.0), "0º N");
        assert_eq!(bearing_label(90.0), "90º E");
        assert_eq!(bearing_label(200.0), "200º S");
        assert_eq!(bearing_label(350.0), "350º N");
        assert_eq!(bearing_label(-10.0), "350º N");
    }

    #[test]
    fn bearing_labels_round_before_wrapping() {
        assert_eq!(bearing_label(359.6), "0º N");
        assert_eq!(bearing_label(89.6), "90º E");
        assert_eq!(bearing_label(22.4), "22º N");
        assert_eq!(bearing_label(22.6), "23º NE");
    }

    #[test]
    fn blip_scales_world_metres_onto_the_face() {
        let radar = Radar::new(1.0).unwrap();
        let (x, y) = radar.blip(Vector3::new(500.0, 3.0, -250.0)).unwrap();
        assert_abs_diff_eq!(x, 60.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn blip_skips_origin_and_out_of_range_points() {
        let radar = Radar::new(1.0).unwrap();
        assert!(radar.blip(Vector3::new(0.0, 12.0, 0.0)).is_none());
        assert!(radar.blip(Vector3::new(0.0, 0.0, -1000.0)).is_none());
        assert!(radar.blip(Vector3::new(0.0, 0.0, -999.0)).is_some());
    }

    #[test]
    fn fling_halves_and_doubles_range() {
        let mut radar = Radar::new(10.0).unwrap();
        let t = GestureThresholds::default();
        assert!(radar.on_fling(&FlingGesture::new((400.0, 0.0), (200.0, 10.0), -800.0, 0.0), &t));
        assert_eq!(radar.range_in_kilometers(), 5.0);
        assert!(radar.on_fling(&FlingGesture::new((200.0, 0.0), (400.0, 10.0), 800.0, 0.0), &t));
        assert!(radar.on_fling(&FlingGesture::new((200.0, 0.0), (400.0, 10.0), 800.0, 0.0), &t));
        assert_eq!(radar.range(), 20_000.0);
    }

    #[test]
    fn short_or_off_path_flings_leave_range_alone() {
        let mut radar = Radar::new(10.0).unwrap();
        let t = GestureThresholds::default();
        assert!(radar.on_fling(&FlingGesture::new((200.0, 0.0), (300.0, 0.0), 800.0, 0.0), &t));
        assert!(!radar.on_fling(&FlingGesture::new((200.0, 0.0), (400.0, 300.0), 800.0, 0.0), &t));
        assert_eq!(radar.range_in_kilometers(), 10.0);
    }

    #[test]
    fn invalid_range_is_rejected() {
        assert!(Radar::new(0.0).is_err());
        let mut radar = Radar::new(1.0).unwrap();
        assert!(radar.set_range(f64::INFINITY).is_err());
        assert_eq!(radar.range(), 1000.0);
    }

    #[test]
    fn paint_rotates_face_against_bearing_and_restores() {
        let radar = Radar::new(1.0).unwrap();
        let mut canvas = RecordingCanvas::new(320, 240);
        radar.paint(&mut canvas, 90.0, &[]);

        let commands = canvas.commands();
        let face = &commands[0];
        assert!(matches!(face.shape, Shape::Circle { radius, .. } if radius == RADAR_RADIUS));
        assert_abs_diff_eq!(face.transform.angle(), -std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(canvas.depth(), 0);

        let texts: Vec<&str> = commands
            .iter()
            .filter_map(|c| match &c.shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["1km", "90º E"]);
    }
}
