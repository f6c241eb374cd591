use serde::{Deserialize, Serialize};

/// Swipe limits in pixels and pixels per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    pub min_distance: f64,
    pub max_off_path: f64,
    pub min_velocity: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            min_distance: 120.0,
            max_off_path: 250.0,
            min_velocity: 200.0,
        }
    }
}

/// A completed fling: where it started, where it ended and how fast it was.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlingGesture {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub velocity_x: f64,
    pub velocity_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeChange {
    Halve,
    Double,
}

impl FlingGesture {
    pub fn new(start: (f64, f64), end: (f64, f64), velocity_x: f64, velocity_y: f64) -> Self {
        Self {
            start,
            end,
            velocity_x,
            velocity_y,
        }
    }

    /// Whether the fling stayed close to horizontal and was fast enough to
    /// count as a swipe at all.
    pub fn is_horizontal_swipe(&self, thresholds: &GestureThresholds) -> bool {
        let off_path = (self.start.1 - self.end.1).abs();
        off_path <= thresholds.max_off_path && self.velocity_x.abs() > thresholds.min_velocity
    }

    /// Range change requested by a swipe; `None` for rejected or short ones.
    pub fn range_change(&self, thresholds: &GestureThresholds) -> Option<RangeChange> {
        if !self.is_horizontal_swipe(thresholds) {
            return None;
        }
        if self.start.0 - self.end.0 > thresholds.min_distance {
            Some(RangeChange::Halve)
        } else if self.end.0 - self.start.0 > thresholds.min_distance {
            Some(RangeChange::Double)
        } else {
            None
        }
    }
}
