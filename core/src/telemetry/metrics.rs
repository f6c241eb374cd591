use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters shared between the sensor callback and the render loop.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub samples_fused: usize,
    pub samples_rejected: usize,
    pub frames_rendered: usize,
    pub frames_without_location: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_fused(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.samples_fused += 1;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.samples_rejected += 1;
        }
    }

    pub fn record_frame(&self, had_location: bool) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_rendered += 1;
            if !had_location {
                metrics.frames_without_location += 1;
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
