use crate::math::Matrix3x3;
use ndarray::{Array2, Array3, Axis};

/// Number of orientations averaged by the overlay, roughly one second of
/// samples at game sensor rates.
pub const HISTORY_CAPACITY: usize = 60;

/// Fixed-size ring of recent orientation matrices.
///
/// The smoothed orientation is the element-wise mean over every slot,
/// including slots still holding the identity they were reset to.
pub struct OrientationHistory {
    slots: Array3<f64>,
    next: usize,
}

impl OrientationHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut history = Self {
            slots: Array3::zeros((capacity.max(1), 3, 3)),
            next: 0,
        };
        history.reset();
        history
    }

    pub fn capacity(&self) -> usize {
        self.slots.len_of(Axis(0))
    }

    /// Slot the next orientation will overwrite.
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Sets every slot back to the identity and rewinds the ring.
    pub fn reset(&mut self) {
        let identity = Array2::<f64>::eye(3);
        for mut slot in self.slots.outer_iter_mut() {
            slot.assign(&identity);
        }
        self.next = 0;
    }

    /// Stores `orientation` in the next slot and returns the new average.
    pub fn push(&mut self, orientation: &Matrix3x3) -> Matrix3x3 {
        self.slots
            .index_axis_mut(Axis(0), self.next)
            .assign(&orientation.to_array2());
        self.next = (self.next + 1) % self.capacity();
        self.smoothed()
    }

    pub fn smoothed(&self) -> Matrix3x3 {
        let mean = self.slots.sum_axis(Axis(0)) / self.capacity() as f64;
        let mut values = [0.0; 9];
        for (slot, value) in values.iter_mut().zip(mean.iter()) {
            *slot = *value;
        }
        Matrix3x3::from_row_major(values)
    }
}

impl Default for OrientationHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_close(a: &Matrix3x3, b: &Matrix3x3, epsilon: f64) {
        for (x, y) in a.as_array().iter().zip(b.as_array().iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = epsilon);
        }
    }

    #[test]
    fn fresh_history_averages_to_identity() {
        let history = OrientationHistory::new();
        assert_eq!(history.capacity(), 60);
        assert_close(&history.smoothed(), &Matrix3x3::identity(), 1e-12);
    }

    #[test]
    fn full_ring_of_identical_matrices_averages_to_that_matrix() {
        let mut history = OrientationHistory::new();
        let m = Matrix3x3::y_rotation(1.2);
        let mut smoothed = Matrix3x3::identity();
        for _ in 0..HISTORY_CAPACITY {
            smoothed = history.push(&m);
        }
        assert_close(&smoothed, &m, 1e-9);
    }

    #[test]
    fn one_outlier_moves_the_average_by_a_sixtieth() {
        let mut history = OrientationHistory::new();
        let base = Matrix3x3::y_rotation(0.5);
        let outlier = Matrix3x3::x_rotation(-0.9);
        for _ in 0..HISTORY_CAPACITY - 1 {
            history.push(&base);
        }
        let smoothed = history.push(&outlier);
        let expected = base + (outlier + base * -1.0) * (1.0 / HISTORY_CAPACITY as f64);
        assert_close(&smoothed, &expected, 1e-9);
    }

    #[test]
    fn index_wraps_around() {
        let mut history = OrientationHistory::with_capacity(3);
        for _ in 0..4 {
            history.push(&Matrix3x3::zero());
        }
        assert_eq!(history.next_index(), 1);
        history.reset();
        assert_eq!(history.next_index(), 0);
        assert_close(&history.smoothed(), &Matrix3x3::identity(), 1e-12);
    }

    #[test]
    fn partially_filled_ring_still_counts_identity_slots() {
        let mut history = OrientationHistory::with_capacity(4);
        let smoothed = history.push(&Matrix3x3::zero());
        assert_close(&smoothed, &Matrix3x3::scale(0.75), 1e-12);
    }
}
