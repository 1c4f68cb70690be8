//! Summary statistics for a layer.

use ndarray::Array2;
use std::fmt;

/// Min, max, and mean over the finite cells of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStats {
    /// Smallest finite value (NaN if there is none).
    pub min: f64,
    /// Largest finite value (NaN if there is none).
    pub max: f64,
    /// Mean of the finite values (NaN if there is none).
    pub mean: f64,
    /// Number of finite cells.
    pub finite: usize,
    /// Total number of cells.
    pub total: usize,
}

impl LayerStats {
    /// Compute statistics for any numeric grid.
    pub fn of<T: Copy + Into<f64>>(layer: &Array2<T>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut finite = 0;

        for v in layer.iter().map(|&v| -> f64 { v.into() }).filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            finite += 1;
        }

        if finite == 0 {
            return Self {
                min: f64::NAN,
                max: f64::NAN,
                mean: f64::NAN,
                finite,
                total: layer.len(),
            };
        }

        Self {
            min,
            max,
            mean: sum / finite as f64,
            finite,
            total: layer.len(),
        }
    }

    /// `max - min`, or NaN without finite values.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

impl fmt::Display for LayerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min {:.3}, max {:.3}, mean {:.3} ({}/{} finite)",
            self.min, self.max, self.mean, self.finite, self.total
        )
    }
}
