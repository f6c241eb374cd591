use geoarcore::math::Vector3;
use geoarcore::orientation::pose::SensorReadings;
use geoarcore::orientation::DevicePose;
use geoarcore::prelude::SensorSample;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Noisy accelerometer/magnetometer stream for a device held in a fixed pose.
pub struct SensorStream {
    readings: SensorReadings,
    noise: f64,
    rng: StdRng,
}

impl SensorStream {
    /// `declination_deg` is the true local declination: the simulated field
    /// points that far east of true north.
    pub fn new(pose: DevicePose, declination_deg: f64, noise: f64, seed: u64) -> Self {
        Self {
            readings: pose.reference_readings(declination_deg),
            noise: noise.abs(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn readings(&self) -> &SensorReadings {
        &self.readings
    }

    fn jitter(&mut self, clean: Vector3) -> Vector3 {
        if self.noise == 0.0 {
            return clean;
        }
        let noise = self.noise;
        clean
            + Vector3::new(
                self.rng.gen_range(-noise..noise),
                self.rng.gen_range(-noise..noise),
                self.rng.gen_range(-noise..noise),
            )
    }

    /// One accelerometer sample followed by one magnetometer sample.
    pub fn next_pair(&mut self) -> [SensorSample; 2] {
        let accelerometer = self.jitter(self.readings.accelerometer);
        let magnetometer = self.jitter(self.readings.magnetometer);
        [
            SensorSample::accelerometer(accelerometer),
            SensorSample::magnetometer(magnetometer),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoarcore::prelude::SensorKind;

    #[test]
    fn noiseless_stream_repeats_clean_readings() {
        let mut stream = SensorStream::new(DevicePose::new(30.0, 0.0), 0.0, 0.0, 1);
        let [a, m] = stream.next_pair();
        assert_eq!(a.kind, SensorKind::Accelerometer);
        assert_eq!(m.kind, SensorKind::Magnetometer);
        assert_eq!(a.values, stream.readings().accelerometer);
        assert_eq!(stream.next_pair()[1].values, stream.readings().magnetometer);
    }

    #[test]
    fn jitter_stays_within_noise_and_is_seeded() {
        let mut first = SensorStream::new(DevicePose::new(0.0, 0.0), 0.0, 0.2, 42);
        let mut second = SensorStream::new(DevicePose::new(0.0, 0.0), 0.0, 0.2, 42);
        for _ in 0..50 {
            let [a, _] = first.next_pair();
            let delta = a.values - first.readings().accelerometer;
            assert!(delta.x.abs() < 0.2 && delta.y.abs() < 0.2 && delta.z.abs() < 0.2);
            assert_eq!(a.values, second.next_pair()[0].values);
        }
    }
}
