use anyhow::Context;
use clap::Parser;
use geoarcore::geo::GeoPosition;
use geoarcore::math::point::format_distance;
use geoarcore::orientation::DevicePose;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::VisualizationModel;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{DeclinationSource, ScenarioConfig};
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Scenario driver for the geo-referenced POI overlay")]
struct Args {
    /// Load a scenario from YAML instead of the flags below
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long, default_value_t = 38.7223, allow_hyphen_values = true)]
    latitude: f64,
    #[arg(long, default_value_t = -9.1393, allow_hyphen_values = true)]
    longitude: f64,
    #[arg(long, default_value_t = 50.0, allow_hyphen_values = true)]
    altitude: f64,
    /// True heading of the camera in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    heading: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pitch: f64,
    /// Fixed declination in degrees; the dipole model is used when absent
    #[arg(long, allow_hyphen_values = true)]
    declination: Option<f64>,
    #[arg(long, default_value_t = 30)]
    frames: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Append a one-line summary of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Keep the GUI bridge alive for the viewer
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        let mut config = ScenarioConfig::from_args(
            GeoPosition::new(args.latitude, args.longitude, args.altitude),
            DevicePose::new(args.heading, args.pitch),
            args.frames,
            args.seed,
        );
        if let Some(degrees) = args.declination {
            config.declination = DeclinationSource::Fixed { degrees };
        }
        config
    };

    let runner = Runner::new(scenario.clone());
    let gui_bridge = GuiBridge::new(Arc::new(runner.clone()));
    let result = runner.execute().context("running scenario")?;
    let name = scenario.name.as_deref().unwrap_or("scenario");
    let model = VisualizationModel::from_result(
        name,
        scenario.viewport.width,
        scenario.viewport.height,
        &result,
    );

    println!(
        "{} -> azimuth {:.1}, pitch {:.1}, declination {:.2}, radar {}, visible {:?}, centred {:?}",
        name,
        model.azimuth,
        model.pitch,
        model.declination,
        format_distance(model.radar_range_m),
        model.visible,
        model.centered
    );
    println!(
        "samples fused {}, rejected {}, frames {}",
        result.metrics.samples_fused, result.metrics.samples_rejected, result.metrics.frames_rendered
    );
    gui_bridge.publish(&model)?;

    if let Some(report_path) = args.report {
        let line = format!(
            "{} azimuth={:.2} pitch={:.2} visible={:?} fused={} rejected={}\n",
            name,
            model.azimuth,
            model.pitch,
            model.visible,
            result.metrics.samples_fused,
            result.metrics.samples_rejected
        );
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&report_path)
            .with_context(|| format!("opening report {}", report_path.display()))?;
        file.write_all(line.as_bytes())?;
    }

    if args.serve {
        gui_bridge.serve();
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
