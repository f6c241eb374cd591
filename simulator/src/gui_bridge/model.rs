use crate::workflow::runner::ScenarioResult;
use geoarcore::render::DrawCommand;
use geoarcore::telemetry::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Latest frame as served to the viewer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    pub scenario: String,
    pub width: u32,
    pub height: u32,
    pub azimuth: f64,
    pub pitch: f64,
    pub declination: f64,
    pub radar_range_m: f64,
    pub visible: Vec<String>,
    pub centered: Option<String>,
    pub commands: Vec<DrawCommand>,
    pub metrics: MetricsSnapshot,
}

impl VisualizationModel {
    pub fn from_result(scenario: &str, width: u32, height: u32, result: &ScenarioResult) -> Self {
        let name_of = |id: u32| {
            result
                .poi_names
                .iter()
                .find(|(candidate, _)| *candidate == id)
                .map(|(_, name)| name.clone())
                .unwrap_or_else(|| format!("#{id}"))
        };

        let mut model = Self {
            scenario: scenario.to_owned(),
            width,
            height,
            declination: result.declination_deg,
            commands: result.commands.clone(),
            metrics: result.metrics,
            ..Self::default()
        };
        if let Some(frame) = result.last_frame() {
            model.azimuth = frame.azimuth;
            model.pitch = frame.pitch;
            model.radar_range_m = frame.radar_range_m;
            model.visible = frame.visible.iter().map(|id| name_of(*id)).collect();
            model.centered = frame.centered.map(name_of);
        }
        model
    }
}
