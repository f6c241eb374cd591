use num_complex::Complex64;

/// Nominal horizontal view angle shown on the radar.
pub const DEFAULT_VIEW_ANGLE_DEG: f64 = 45.0;

/// One boundary line of the viewing cone drawn on the radar. The line runs
/// from `tip` to the radar centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfVision {
    tip: Complex64,
}

impl FieldOfVision {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            tip: Complex64::new(x, y),
        }
    }

    /// Rotates the tip about the local origin by `degrees` (clockwise on a
    /// y-down screen).
    pub fn rotate(&mut self, degrees: f64) {
        self.tip *= Complex64::from_polar(1.0, degrees.to_radians());
    }

    pub fn add(&mut self, dx: f64, dy: f64) {
        self.tip += Complex64::new(dx, dy);
    }

    pub fn tip(&self) -> (f64, f64) {
        (self.tip.re, self.tip.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotation_keeps_length() {
        let mut line = FieldOfVision::new(0.0, -40.0);
        line.rotate(DEFAULT_VIEW_ANGLE_DEG / 2.0);
        let (x, y) = line.tip();
        assert_abs_diff_eq!(x.hypot(y), 40.0, epsilon = 1e-12);
        assert!(x > 0.0 && y < 0.0);
    }

    #[test]
    fn quarter_turn_maps_up_to_right() {
        let mut line = FieldOfVision::new(0.0, -1.0);
        line.rotate(90.0);
        line.add(2.0, 3.0);
        let (x, y) = line.tip();
        assert_abs_diff_eq!(x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 3.0, epsilon = 1e-12);
    }
}
