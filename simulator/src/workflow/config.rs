use anyhow::{ensure, Context};
use geoarcore::geo::{DipoleField, FixedDeclination, GeoPosition, GeomagneticModel};
use geoarcore::orientation::DevicePose;
use geoarcore::poi::PoiGroup;
use geoarcore::radar::FlingGesture;
use geoarcore::OverlayConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where the simulated magnetometer gets its declination from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DeclinationSource {
    Fixed { degrees: f64 },
    Dipole,
}

impl DeclinationSource {
    pub fn model(&self) -> Box<dyn GeomagneticModel> {
        match self {
            DeclinationSource::Fixed { degrees } => Box::new(FixedDeclination(*degrees)),
            DeclinationSource::Dipole => Box::new(DipoleField::default()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// One simulated session: a device held still at `location` with the given
/// pose, looking at a set of POI groups for a number of frames.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub name: Option<String>,
    pub location: GeoPosition,
    pub pose: DevicePose,
    pub declination: DeclinationSource,
    /// Peak uniform jitter added to every sensor axis, in sensor units.
    pub sensor_noise: f64,
    pub seed: u64,
    pub frames: usize,
    pub samples_per_frame: usize,
    pub viewport: Viewport,
    pub overlay: OverlayConfig,
    /// Applied to the radar before the first frame.
    pub flings: Vec<FlingGesture>,
    /// When empty, a demo ring of POIs is generated around `location`.
    pub groups: Vec<PoiGroup>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: None,
            location: GeoPosition::new(38.7223, -9.1393, 50.0),
            pose: DevicePose::new(0.0, 0.0),
            declination: DeclinationSource::Dipole,
            sensor_noise: 0.05,
            seed: 0,
            frames: 30,
            samples_per_frame: 4,
            viewport: Viewport {
                width: 800,
                height: 480,
            },
            overlay: OverlayConfig::default(),
            flings: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario config {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating scenario config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(location: GeoPosition, pose: DevicePose, frames: usize, seed: u64) -> Self {
        Self {
            location,
            pose,
            frames,
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.frames > 0, "frames must be at least 1");
        ensure!(self.samples_per_frame > 0, "samples_per_frame must be at least 1");
        ensure!(
            self.viewport.width > 0 && self.viewport.height > 0,
            "viewport must be non-empty"
        );
        ensure!(
            self.sensor_noise >= 0.0 && self.sensor_noise.is_finite(),
            "sensor_noise must be a non-negative number"
        );
        self.overlay.validate().context("overlay settings")?;
        Ok(())
    }
}
