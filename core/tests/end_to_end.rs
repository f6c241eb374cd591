use approx::assert_abs_diff_eq;
use chrono::Utc;
use geoarcore::geo::FixedDeclination;
use geoarcore::orientation::{DevicePose, HISTORY_CAPACITY};
use geoarcore::poi::PoiModel;
use geoarcore::prelude::*;
use geoarcore::render::{Color, RecordingCanvas, Shape};
use geoarcore::{OverlayConfig, PoiOverlay};
use std::sync::Arc;

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn settled_geo(heading_deg: f64, declination_deg: f64) -> Arc<GeoReference> {
    let geo = Arc::new(GeoReference::with_model(Box::new(FixedDeclination(
        declination_deg,
    ))));
    let mut filter = OrientationFilter::new(Arc::clone(&geo));
    filter.on_location(GeoPosition::new(0.0, 0.0, 0.0), Utc::now());
    filter.resume();

    let readings = DevicePose::new(heading_deg, 0.0).reference_readings(declination_deg);
    for _ in 0..HISTORY_CAPACITY {
        filter.process(SensorSample::accelerometer(readings.accelerometer));
        filter.process(SensorSample::magnetometer(readings.magnetometer));
    }
    geo
}

fn north_group() -> PoiGroup {
    let mut group = PoiGroup::new("scenario", "");
    group.add_point(PointOfInterest::new("north", "", 0.01, 0.0, 0.0));
    group
}

fn radar_blips(canvas: &RecordingCanvas) -> usize {
    canvas
        .commands()
        .iter()
        .filter(|c| c.paint.color == Color::RED && matches!(c.shape, Shape::Circle { .. }))
        .count()
}

#[test]
fn device_facing_north_sees_poi_straight_ahead() {
    let geo = settled_geo(0.0, 0.0);
    assert!(geo.rotation().max_abs_difference(&Matrix3x3::identity()) < 1e-9);
    assert_abs_diff_eq!(geo.azimuth().unwrap(), 0.0, epsilon = 1e-6);

    let group = north_group();
    let mut poi = SimplePoi::new(Arc::clone(&group.points()[0]));
    poi.update(&GeoPosition::new(0.0, 0.0, 0.0));
    let world = poi.world_position();
    assert!(world.z < 0.0);
    assert_abs_diff_eq!(world.z, -1111.95, epsilon = 0.05);
    assert_abs_diff_eq!(world.x, 0.0, epsilon = 1e-9);

    let mut camera = ProjectionCamera::new(WIDTH, HEIGHT).unwrap();
    camera.set_rotation(geo.rotation());
    poi.perform_world_transformations(&camera).unwrap();
    assert!(poi.screen_position().z < -1.0);
    assert!(poi.is_visible());
    assert!(poi.is_centered());
}

#[test]
fn radar_plots_poi_only_when_range_covers_it() {
    let geo = settled_geo(0.0, 0.0);
    let groups = [north_group()];

    for (range_km, expected) in [(1.0, 0), (1.2, 1), (5.0, 1)] {
        let config = OverlayConfig {
            radar_range_km: range_km,
            ..OverlayConfig::default()
        };
        let mut overlay = PoiOverlay::from_groups(Arc::clone(&geo), &groups, config).unwrap();
        let mut canvas = RecordingCanvas::new(WIDTH, HEIGHT);
        let report = overlay.draw(&mut canvas).unwrap();
        assert!(report.had_location);
        assert_eq!(radar_blips(&canvas), expected, "range {range_km} km");
    }
}

#[test]
fn declination_and_heading_end_up_in_the_radar_label() {
    let geo = settled_geo(90.0, 4.0);
    assert_abs_diff_eq!(geo.azimuth().unwrap(), 90.0, epsilon = 1e-6);

    let mut overlay =
        PoiOverlay::from_groups(Arc::clone(&geo), &[north_group()], OverlayConfig::default())
            .unwrap();
    let mut canvas = RecordingCanvas::new(WIDTH, HEIGHT);
    let report = overlay.draw(&mut canvas).unwrap();
    assert!(report.visible.is_empty());

    let labels: Vec<String> = canvas
        .commands()
        .iter()
        .filter_map(|c| match &c.shape {
            Shape::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert!(labels.iter().any(|l| l == "90º E"), "labels: {labels:?}");
}
