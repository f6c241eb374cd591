use crate::geo::GeoPosition;
use crate::math::point::{planar_angle, point_inside};
use crate::math::Vector3;
use crate::poi::label::{TextBlock, LABEL_MAX_WIDTH};
use crate::poi::model::PointOfInterest;
use crate::prelude::GeoResult;
use crate::projection::ProjectionCamera;
use crate::render::{Canvas, Color, Paint, Style};
use std::sync::Arc;

/// Half-width in pixels of the vertical strip that counts as "centred".
pub const CENTRE_STRIP_HALF_WIDTH: f64 = 20.0;
/// Projected depth a marker must be beyond to be drawn.
pub const VISIBILITY_DEPTH: f64 = -1.0;

const MARKER_COLOR: Color = Color::argb(0xdd, 0xee, 0x11, 0x11);

/// Per-frame screen representation of one point of interest.
///
/// Call order each frame: [`update`](PoiModel::update), then
/// [`perform_world_transformations`](PoiModel::perform_world_transformations),
/// then [`draw`](PoiModel::draw).
pub trait PoiModel: Send {
    fn info(&self) -> &Arc<PointOfInterest>;
    /// Position relative to the device, in metres (x east, y up, z south).
    fn world_position(&self) -> Vector3;
    /// Projected marker position; `z` carries the camera-space depth.
    fn screen_position(&self) -> Vector3;
    fn is_visible(&self) -> bool;
    fn is_centered(&self) -> bool;

    fn update(&mut self, current: &GeoPosition);
    fn perform_world_transformations(&mut self, camera: &ProjectionCamera) -> GeoResult<()>;
    fn draw(&mut self, canvas: &mut dyn Canvas);
    fn is_click_valid(&self, x: f64, y: f64) -> bool;

    /// Drops the derived state of a POI that was not updated this frame, so
    /// it is neither drawn, tappable nor plotted on the radar.
    fn reset(&mut self);

    /// Returns whether the tap was consumed.
    fn on_click(&mut self) -> bool {
        true
    }
}

/// Hollow circle marker with a word-wrapped name label.
#[derive(Debug, Clone)]
pub struct SimplePoi {
    info: Arc<PointOfInterest>,
    world: Vector3,
    projected: Vector3,
    label_anchor: Vector3,
    label: Option<TextBlock>,
    visible: bool,
    centered: bool,
    max_height: f64,
    centre_half_width: f64,
}

impl SimplePoi {
    pub fn new(info: Arc<PointOfInterest>) -> Self {
        Self {
            info,
            world: Vector3::ZERO,
            projected: Vector3::ZERO,
            label_anchor: Vector3::ZERO,
            label: None,
            visible: false,
            centered: false,
            max_height: 0.0,
            centre_half_width: CENTRE_STRIP_HALF_WIDTH,
        }
    }

    pub fn with_centre_half_width(mut self, half_width: f64) -> Self {
        self.centre_half_width = half_width;
        self
    }

    /// Projected position of a point one metre above the marker.
    pub fn label_anchor(&self) -> Vector3 {
        self.label_anchor
    }

    /// Marker size derived from the canvas height at the last draw.
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    fn draw_marker(&self, canvas: &mut dyn Canvas) {
        let divisor = if self.centered { 5.0 } else { 10.0 };
        let paint = Paint::default()
            .with_color(MARKER_COLOR)
            .with_style(Style::Stroke)
            .with_stroke_width(self.max_height / divisor);
        canvas.draw_circle(
            self.projected.x,
            self.projected.y,
            self.max_height / 1.5,
            &paint,
        );
    }

    /// Direction from the marker to the label anchor in screen degrees;
    /// straight up when the two coincide.
    fn label_angle(&self) -> f64 {
        planar_angle(
            (self.projected.x, self.projected.y),
            (self.label_anchor.x, self.label_anchor.y),
        )
        .unwrap_or(-90.0)
    }
}

impl PoiModel for SimplePoi {
    fn info(&self) -> &Arc<PointOfInterest> {
        &self.info
    }

    fn world_position(&self) -> Vector3 {
        self.world
    }

    fn screen_position(&self) -> Vector3 {
        self.projected
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_centered(&self) -> bool {
        self.centered
    }

    fn update(&mut self, current: &GeoPosition) {
        self.world = self.info.world_vector(current);
    }

    /// On error the marker is hidden for this frame.
    fn perform_world_transformations(&mut self, camera: &ProjectionCamera) -> GeoResult<()> {
        self.visible = false;
        self.centered = false;

        let rotation = camera.rotation();
        let marker = *rotation * self.world;
        let above = *rotation * (self.world + Vector3::UNIT_Y);
        self.projected = camera.project(marker)?;
        self.label_anchor = camera.project(above)?;

        let width = f64::from(camera.width());
        let height = f64::from(camera.height());
        self.visible = self.projected.z < VISIBILITY_DEPTH;
        self.centered = point_inside(
            self.projected.x,
            self.projected.y,
            width / 2.0 - self.centre_half_width,
            0.0,
            self.centre_half_width * 2.0,
            height,
        );
        Ok(())
    }

    fn draw(&mut self, canvas: &mut dyn Canvas) {
        self.max_height = (f64::from(canvas.height()) / 10.0 + 0.5).floor() + 1.0;
        if self.label.is_none() {
            self.label = Some(TextBlock::layout(&self.info.name, LABEL_MAX_WIDTH, &*canvas));
        }
        if !self.visible {
            return;
        }

        let angle = self.label_angle();
        self.draw_marker(canvas);

        if let Some(label) = &self.label {
            canvas.save();
            canvas.translate(
                self.label_anchor.x,
                self.label_anchor.y + self.max_height + label.height() / 2.0,
            );
            canvas.rotate(angle + 90.0);
            canvas.translate(-label.width() / 2.0, -label.height() / 2.0);
            label.draw(canvas);
            canvas.restore();
        }
    }

    /// Square hit box of half-extent `max_height` around a visible marker.
    fn is_click_valid(&self, x: f64, y: f64) -> bool {
        let reach = self.max_height;
        self.visible
            && point_inside(
                x,
                y,
                self.projected.x - reach,
                self.projected.y - reach,
                reach * 2.0,
                reach * 2.0,
            )
    }

    fn reset(&mut self) {
        self.world = Vector3::ZERO;
        self.visible = false;
        self.centered = false;
    }
}
