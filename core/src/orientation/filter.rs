use crate::geo::{GeoPosition, GeoReference};
use crate::math::{Matrix3x3, Vector3};
use crate::orientation::fusion::{GravityMagneticFusion, SensorFusion};
use crate::orientation::history::OrientationHistory;
use crate::orientation::remap::AxisRemap;
use crate::prelude::{GeoResult, SensorStage};
use crate::telemetry::{LogManager, MetricsRecorder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tilt about X applied before the remapped sensor matrix, in degrees.
pub const UPRIGHT_TILT_DEG: f64 = -90.0;
/// Turn about Y applied after the remapped sensor matrix, in degrees.
pub const LANDSCAPE_TURN_DEG: f64 = -90.0;
/// Final tilt about X that makes the camera look along -Z, in degrees.
pub const VIEW_TILT_DEG: f64 = -90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorKind {
    Accelerometer,
    Magnetometer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub values: Vector3,
}

impl SensorSample {
    pub fn accelerometer(values: Vector3) -> Self {
        Self {
            kind: SensorKind::Accelerometer,
            values,
        }
    }

    pub fn magnetometer(values: Vector3) -> Self {
        Self {
            kind: SensorKind::Magnetometer,
            values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterState {
    Inactive,
    Active,
}

/// What happened to a single sensor sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// The filter is paused; the sample was dropped.
    Inactive,
    /// The sample was stored but no orientation could be derived yet.
    Insufficient,
    /// A new smoothed orientation was published to the geo reference.
    Published(Matrix3x3),
}

/// Fixed rotations that carry the remapped sensor matrix into the overlay
/// frame (x east, y up, z south, camera looking along -z).
///
/// The order is `declination * upright * remapped * landscape * view` and
/// must not change: the factors do not commute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionChain {
    declination: Matrix3x3,
    upright: Matrix3x3,
    landscape: Matrix3x3,
    view: Matrix3x3,
}

impl CorrectionChain {
    pub fn new() -> Self {
        Self {
            declination: Matrix3x3::identity(),
            upright: Matrix3x3::x_rotation(UPRIGHT_TILT_DEG.to_radians()),
            landscape: Matrix3x3::y_rotation(LANDSCAPE_TURN_DEG.to_radians()),
            view: Matrix3x3::x_rotation(VIEW_TILT_DEG.to_radians()),
        }
    }

    /// Rotates magnetic bearings onto true bearings.
    pub fn set_declination(&mut self, degrees: f64) {
        self.declination = Matrix3x3::y_rotation((-degrees).to_radians());
    }

    pub fn declination_rotation(&self) -> Matrix3x3 {
        self.declination
    }

    pub fn compose(&self, remapped: &Matrix3x3) -> Matrix3x3 {
        self.declination * self.upright * *remapped * self.landscape * self.view
    }

    /// World-to-camera rotation for one remapped sensor matrix.
    pub fn orientation(&self, remapped: &Matrix3x3) -> GeoResult<Matrix3x3> {
        self.compose(remapped).inverse()
    }
}

impl Default for CorrectionChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns raw accelerometer and magnetometer samples into the smoothed
/// orientation published on the shared [`GeoReference`].
///
/// The filter is `Inactive` until resumed; the smoothing ring only exists
/// while it is `Active`.
pub struct OrientationFilter<F: SensorFusion = GravityMagneticFusion> {
    geo: Arc<GeoReference>,
    fusion: F,
    remap: AxisRemap,
    chain: CorrectionChain,
    accelerometer: Vector3,
    magnetic: Vector3,
    history: Option<OrientationHistory>,
    logger: LogManager,
    metrics: Arc<MetricsRecorder>,
}

impl OrientationFilter<GravityMagneticFusion> {
    pub fn new(geo: Arc<GeoReference>) -> Self {
        Self::with_fusion(geo, GravityMagneticFusion::default())
    }
}

impl<F: SensorFusion> OrientationFilter<F> {
    pub fn with_fusion(geo: Arc<GeoReference>, fusion: F) -> Self {
        Self {
            geo,
            fusion,
            remap: AxisRemap::CAMERA_FACING,
            chain: CorrectionChain::new(),
            accelerometer: Vector3::ZERO,
            magnetic: Vector3::ZERO,
            history: None,
            logger: LogManager::new("orientation"),
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_remap(mut self, remap: AxisRemap) -> Self {
        self.remap = remap;
        self
    }

    pub fn state(&self) -> FilterState {
        if self.history.is_some() {
            FilterState::Active
        } else {
            FilterState::Inactive
        }
    }

    pub fn chain(&self) -> &CorrectionChain {
        &self.chain
    }

    pub fn smoothed(&self) -> Option<Matrix3x3> {
        self.history.as_ref().map(OrientationHistory::smoothed)
    }

    /// Stores a new fix and folds the declination for it into the chain.
    pub fn on_location(&mut self, position: GeoPosition, at: DateTime<Utc>) {
        self.geo.set_location(position);
        self.refresh_declination(at);
    }

    fn refresh_declination(&mut self, at: DateTime<Utc>) {
        match self.geo.declination(at) {
            Ok(degrees) => {
                self.chain.set_declination(degrees);
                self.logger
                    .detail(&format!("declination {:.2} deg", degrees));
            }
            Err(err) => self.logger.detail(&format!("declination unchanged: {err}")),
        }
    }

    /// Feeds one sample through fusion, correction and smoothing.
    pub fn on_sample(&mut self, sample: SensorSample) -> SampleOutcome {
        if self.history.is_none() {
            return SampleOutcome::Inactive;
        }

        match sample.kind {
            SensorKind::Accelerometer => self.accelerometer = sample.values,
            SensorKind::Magnetometer => self.magnetic = sample.values,
        }

        let Some(raw) = self.fusion.rotation_matrix(self.accelerometer, self.magnetic) else {
            self.metrics.record_rejected();
            return SampleOutcome::Insufficient;
        };

        let remapped = self.remap.apply(&raw);
        let orientation = match self.chain.orientation(&remapped) {
            Ok(orientation) => orientation,
            Err(err) => {
                self.metrics.record_rejected();
                self.logger.detail(&format!("sample skipped: {err}"));
                return SampleOutcome::Insufficient;
            }
        };

        let Some(history) = self.history.as_mut() else {
            return SampleOutcome::Inactive;
        };
        let smoothed = history.push(&orientation);
        self.geo.set_rotation(smoothed);
        self.metrics.record_fused();
        SampleOutcome::Published(smoothed)
    }
}

impl<F: SensorFusion> SensorStage for OrientationFilter<F> {
    type Sample = SensorSample;
    type Output = SampleOutcome;

    fn resume(&mut self) {
        match self.history.as_mut() {
            Some(history) => history.reset(),
            None => self.history = Some(OrientationHistory::new()),
        }
        self.refresh_declination(Utc::now());
        self.logger.record("resumed; smoothing ring reset");
    }

    fn process(&mut self, sample: SensorSample) -> SampleOutcome {
        self.on_sample(sample)
    }

    fn pause(&mut self) {
        self.history = None;
        self.logger.record("paused");
    }

    fn is_active(&self) -> bool {
        self.history.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::FixedDeclination;
    use crate::orientation::history::HISTORY_CAPACITY;
    use crate::orientation::pose::DevicePose;
    use approx::assert_abs_diff_eq;

    fn feed(filter: &mut OrientationFilter, pose: DevicePose, declination: f64) -> SampleOutcome {
        let readings = pose.reference_readings(declination);
        let mut outcome = SampleOutcome::Inactive;
        for _ in 0..HISTORY_CAPACITY {
            filter.on_sample(SensorSample::accelerometer(readings.accelerometer));
            outcome = filter.on_sample(SensorSample::magnetometer(readings.magnetometer));
        }
        outcome
    }

    fn active_filter(declination: f64) -> (Arc<GeoReference>, OrientationFilter) {
        let geo = Arc::new(GeoReference::with_model(Box::new(FixedDeclination(declination))));
        let mut filter = OrientationFilter::new(geo.clone());
        filter.on_location(GeoPosition::new(38.7, -9.1, 0.0), Utc::now());
        filter.resume();
        (geo, filter)
    }

    #[test]
    fn samples_are_dropped_while_inactive() {
        let geo = Arc::new(GeoReference::new());
        let mut filter = OrientationFilter::new(geo);
        assert_eq!(filter.state(), FilterState::Inactive);
        let outcome = filter.on_sample(SensorSample::accelerometer(Vector3::new(9.8, 0.0, 0.0)));
        assert_eq!(outcome, SampleOutcome::Inactive);
        assert!(filter.smoothed().is_none());
    }

    #[test]
    fn first_sample_alone_is_insufficient() {
        let (_, mut filter) = active_filter(0.0);
        let outcome = filter.on_sample(SensorSample::accelerometer(Vector3::new(9.8, 0.0, 0.0)));
        assert_eq!(outcome, SampleOutcome::Insufficient);
    }

    #[test]
    fn landscape_device_facing_north_settles_on_identity() {
        let (geo, mut filter) = active_filter(0.0);
        let outcome = feed(&mut filter, DevicePose::new(0.0, 0.0), 0.0);
        let SampleOutcome::Published(smoothed) = outcome else {
            panic!("expected a published orientation, got {outcome:?}");
        };
        assert!(smoothed.max_abs_difference(&Matrix3x3::identity()) < 1e-9);
        assert_abs_diff_eq!(geo.azimuth().unwrap(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn heading_east_yields_azimuth_ninety() {
        let (geo, mut filter) = active_filter(0.0);
        feed(&mut filter, DevicePose::new(90.0, 0.0), 0.0);
        assert_abs_diff_eq!(geo.azimuth().unwrap(), 90.0, epsilon = 1e-6);
        let expected = Matrix3x3::y_rotation(90.0_f64.to_radians());
        assert!(geo.rotation().max_abs_difference(&expected) < 1e-9);
    }

    #[test]
    fn declination_turns_magnetic_heading_into_true_heading() {
        let (geo, mut filter) = active_filter(-12.0);
        feed(&mut filter, DevicePose::new(200.0, 0.0), -12.0);
        assert_abs_diff_eq!(geo.azimuth().unwrap(), 200.0, epsilon = 1e-6);
    }

    #[test]
    fn pitching_up_reports_positive_pitch() {
        let (geo, mut filter) = active_filter(0.0);
        feed(&mut filter, DevicePose::new(0.0, 15.0), 0.0);
        assert_abs_diff_eq!(geo.pitch().unwrap(), 15.0, epsilon = 1e-6);
    }

    #[test]
    fn chain_order_is_declination_upright_remapped_landscape_view() {
        let mut chain = CorrectionChain::new();
        chain.set_declination(7.0);
        let remapped = Matrix3x3::z_rotation(0.3) * Matrix3x3::x_rotation(0.2);
        let expected = Matrix3x3::y_rotation((-7.0_f64).to_radians())
            * Matrix3x3::x_rotation(UPRIGHT_TILT_DEG.to_radians())
            * remapped
            * Matrix3x3::y_rotation(LANDSCAPE_TURN_DEG.to_radians())
            * Matrix3x3::x_rotation(VIEW_TILT_DEG.to_radians());
        assert!(chain.compose(&remapped).max_abs_difference(&expected) < 1e-12);

        let reversed = Matrix3x3::x_rotation(VIEW_TILT_DEG.to_radians())
            * Matrix3x3::y_rotation(LANDSCAPE_TURN_DEG.to_radians())
            * remapped
            * Matrix3x3::x_rotation(UPRIGHT_TILT_DEG.to_radians())
            * Matrix3x3::y_rotation((-7.0_f64).to_radians());
        assert!(chain.compose(&remapped).max_abs_difference(&reversed) > 1e-3);
    }

    #[test]
    fn pause_discards_the_ring_and_resume_resets_it() {
        let (_, mut filter) = active_filter(0.0);
        feed(&mut filter, DevicePose::new(90.0, 0.0), 0.0);
        filter.pause();
        assert_eq!(filter.state(), FilterState::Inactive);
        assert!(filter.smoothed().is_none());

        filter.resume();
        let smoothed = filter.smoothed().unwrap();
        assert!(smoothed.max_abs_difference(&Matrix3x3::identity()) < 1e-12);
    }

    #[test]
    fn rejected_samples_are_counted() {
        let geo = Arc::new(GeoReference::new());
        let metrics = Arc::new(MetricsRecorder::new());
        let mut filter = OrientationFilter::new(geo).with_metrics(metrics.clone());
        filter.resume();
        filter.on_sample(SensorSample::magnetometer(Vector3::new(0.0, 20.0, -40.0)));
        assert_eq!(metrics.snapshot().samples_rejected, 1);
    }
}
