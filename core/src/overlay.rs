//! Per-frame composition of POI markers and the radar on top of the camera
//! preview.

use crate::config::OverlayConfig;
use crate::geo::geodesy::distance_m;
use crate::geo::GeoReference;
use crate::poi::{PoiGroup, PoiModel, SimplePoi};
use crate::prelude::GeoResult;
use crate::projection::ProjectionCamera;
use crate::radar::{FlingGesture, Radar};
use crate::render::Canvas;
use crate::telemetry::{LogManager, MetricsRecorder};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// POI models shared between the overlay and whoever loads them.
pub type SharedPois = Arc<Mutex<Vec<Box<dyn PoiModel>>>>;

/// What a single [`PoiOverlay::draw`] call did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub azimuth: f64,
    pub pitch: f64,
    pub had_location: bool,
    /// POIs within radar range that were updated this frame.
    pub updated: usize,
    pub visible: Vec<u32>,
    pub centered: Option<u32>,
    pub radar_range_m: f64,
}

pub struct PoiOverlay {
    geo: Arc<GeoReference>,
    pois: SharedPois,
    radar: Radar,
    camera: Option<ProjectionCamera>,
    config: OverlayConfig,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
    location_missing: bool,
}

impl PoiOverlay {
    pub fn new(
        geo: Arc<GeoReference>,
        pois: Vec<Box<dyn PoiModel>>,
        config: OverlayConfig,
    ) -> GeoResult<Self> {
        config.validate()?;
        Ok(Self {
            geo,
            pois: Arc::new(Mutex::new(pois)),
            radar: Radar::new(config.radar_range_km)?,
            camera: None,
            config,
            logger: LogManager::new("overlay"),
            metrics: Arc::new(MetricsRecorder::new()),
            location_missing: false,
        })
    }

    /// One [`SimplePoi`] per point, groups flattened in order.
    pub fn from_groups(
        geo: Arc<GeoReference>,
        groups: &[PoiGroup],
        config: OverlayConfig,
    ) -> GeoResult<Self> {
        let pois = groups
            .iter()
            .flat_map(|group| group.points().iter())
            .map(|point| {
                Box::new(
                    SimplePoi::new(Arc::clone(point))
                        .with_centre_half_width(config.centre_half_width),
                ) as Box<dyn PoiModel>
            })
            .collect();
        Self::new(geo, pois, config)
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn pois(&self) -> SharedPois {
        Arc::clone(&self.pois)
    }

    pub fn radar(&self) -> &Radar {
        &self.radar
    }

    /// Camera built on the first draw, sized to that canvas.
    pub fn camera(&self) -> Option<&ProjectionCamera> {
        self.camera.as_ref()
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    fn ensure_camera(&mut self, canvas: &dyn Canvas) -> GeoResult<()> {
        if self.camera.is_some() {
            return Ok(());
        }
        let mut camera = ProjectionCamera::new(canvas.width(), canvas.height())?;
        camera.set_field_of_view(self.config.field_of_view_deg.to_radians())?;
        self.logger.detail(&format!(
            "camera {}x{} focal {:.1}",
            camera.width(),
            camera.height(),
            camera.focal_distance()
        ));
        self.camera = Some(camera);
        Ok(())
    }

    /// Draws one frame: POIs within radar range first, the radar on top.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> GeoResult<FrameReport> {
        self.ensure_camera(canvas)?;
        if let Some(camera) = self.camera.as_mut() {
            camera.set_rotation(self.geo.rotation());
        }

        let azimuth = self.geo.azimuth().unwrap_or_else(|err| {
            self.logger.detail(&format!("azimuth undefined: {err}"));
            0.0
        });
        let pitch = self.geo.pitch().unwrap_or(0.0);
        let location = self.geo.location();

        let mut report = FrameReport {
            azimuth,
            pitch,
            had_location: location.is_some(),
            radar_range_m: self.radar.range(),
            ..FrameReport::default()
        };

        match location {
            None if !self.location_missing => {
                self.logger.warn("no location fix; skipping POI updates");
                self.location_missing = true;
            }
            Some(_) if self.location_missing => {
                self.logger.record("location fix acquired");
                self.location_missing = false;
            }
            _ => {}
        }

        let pois = Arc::clone(&self.pois);
        let mut pois = pois.lock().unwrap_or_else(PoisonError::into_inner);
        for poi in pois.iter_mut() {
            // POIs not updated this frame must not keep stale radar blips or hit boxes.
            let (Some(current), Some(camera)) = (location, self.camera.as_ref()) else {
                poi.reset();
                continue;
            };
            let info = poi.info();
            let distance =
                distance_m(info.latitude, info.longitude, current.latitude, current.longitude);
            if distance >= self.radar.range() {
                poi.reset();
                continue;
            }
            report.updated += 1;
            poi.update(&current);
            if let Err(err) = poi.perform_world_transformations(camera) {
                self.logger
                    .detail(&format!("'{}' not projected: {err}", poi.info().name));
                poi.reset();
                continue;
            }
            poi.draw(canvas);

            if poi.is_visible() {
                report.visible.push(poi.info().identifier);
                if poi.is_centered() && report.centered.is_none() {
                    report.centered = Some(poi.info().identifier);
                }
            }
        }

        self.radar.paint(canvas, azimuth, &pois);
        self.metrics.record_frame(report.had_location);
        Ok(report)
    }

    /// Routes a tap to the first POI whose hit box contains it.
    pub fn on_tap(&mut self, x: f64, y: f64) -> bool {
        let mut pois = self.pois.lock().unwrap_or_else(PoisonError::into_inner);
        match pois.iter_mut().find(|poi| poi.is_click_valid(x, y)) {
            Some(poi) => {
                self.logger.record(&format!("tapped '{}'", poi.info().name));
                poi.on_click()
            }
            None => false,
        }
    }

    pub fn on_fling(&mut self, fling: &FlingGesture) -> bool {
        self.radar.on_fling(fling, &self.config.gestures)
    }
}
