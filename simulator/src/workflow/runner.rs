use crate::generator::profile::SensorStream;
use crate::generator::template::demo_ring;
use crate::workflow::config::ScenarioConfig;
use anyhow::Context;
use chrono::{DateTime, Utc};
use geoarcore::prelude::{GeoReference, OrientationFilter, SampleOutcome, SensorStage};
use geoarcore::render::{DrawCommand, RecordingCanvas};
use geoarcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use geoarcore::{FrameReport, PoiOverlay};
use log::{debug, info};
use std::sync::Arc;

const DEMO_RING_SIZE: usize = 8;
const DEMO_RING_RADIUS_M: f64 = 800.0;

pub struct ScenarioResult {
    pub declination_deg: f64,
    pub frames: Vec<FrameReport>,
    /// Draw commands of the last frame.
    pub commands: Vec<DrawCommand>,
    pub poi_names: Vec<(u32, String)>,
    pub metrics: MetricsSnapshot,
}

impl ScenarioResult {
    pub fn last_frame(&self) -> Option<&FrameReport> {
        self.frames.last()
    }
}

#[derive(Clone)]
pub struct Runner {
    config: ScenarioConfig,
}

impl Runner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<ScenarioResult> {
        self.execute_with(&self.config, Utc::now())
    }

    /// Runs `config` with the sensor clock pinned to `at`.
    pub fn execute_with(
        &self,
        config: &ScenarioConfig,
        at: DateTime<Utc>,
    ) -> anyhow::Result<ScenarioResult> {
        config.validate().context("validating scenario")?;

        let geo = Arc::new(GeoReference::with_model(config.declination.model()));
        let metrics = Arc::new(MetricsRecorder::new());

        let mut filter =
            OrientationFilter::new(Arc::clone(&geo)).with_metrics(Arc::clone(&metrics));
        filter.resume();
        filter.on_location(config.location, at);
        let declination_deg = geo
            .declination(at)
            .context("computing declination at the scenario location")?;

        let groups = if config.groups.is_empty() {
            vec![demo_ring(&config.location, DEMO_RING_SIZE, DEMO_RING_RADIUS_M)]
        } else {
            config.groups.clone()
        };
        let poi_names = groups
            .iter()
            .flat_map(|group| group.points().iter())
            .map(|point| (point.identifier, point.name.clone()))
            .collect();

        let mut overlay = PoiOverlay::from_groups(Arc::clone(&geo), &groups, config.overlay.clone())
            .context("building overlay")?
            .with_metrics(Arc::clone(&metrics));
        for fling in &config.flings {
            overlay.on_fling(fling);
        }

        let mut stream = SensorStream::new(
            config.pose,
            declination_deg,
            config.sensor_noise,
            config.seed,
        );
        let mut frames = Vec::with_capacity(config.frames);
        let mut commands = Vec::new();

        for frame in 0..config.frames {
            for _ in 0..config.samples_per_frame {
                for sample in stream.next_pair() {
                    if let SampleOutcome::Inactive = filter.process(sample) {
                        anyhow::bail!("orientation filter stopped mid-scenario");
                    }
                }
            }

            let mut canvas = RecordingCanvas::new(config.viewport.width, config.viewport.height);
            let report = overlay
                .draw(&mut canvas)
                .with_context(|| format!("drawing frame {frame}"))?;
            debug!(
                "frame {} azimuth {:.1} pitch {:.1} visible {:?}",
                frame, report.azimuth, report.pitch, report.visible
            );
            commands = canvas.take_commands();
            frames.push(report);
        }
        filter.pause();

        let result = ScenarioResult {
            declination_deg,
            frames,
            commands,
            poi_names,
            metrics: metrics.snapshot(),
        };
        if let Some(last) = result.last_frame() {
            info!(
                "scenario {} settled at azimuth {:.1}, {} POIs visible",
                config.name.as_deref().unwrap_or("<unnamed>"),
                last.azimuth,
                last.visible.len()
            );
        }
        Ok(result)
    }
}
