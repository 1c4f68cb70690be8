//! Slope, flow-proxy, and risk layers.
//!
//! Each layer is a pure function of the previous one:
//!
//! ```text
//! elevation --slope--> slope --flow_proxy--> flow
//!                        \                     \
//!                         +--------risk--------+--> risk
//! ```
//!
//! The names are descriptive only: "slope" is a gradient magnitude in
//! elevation units per pixel, "flow" is a high-gradient mask, and "risk" is
//! an unnormalized blend of the two.

use crate::filters::{gaussian_gradient_magnitude, DEFAULT_TRUNCATE};
use crate::{LayerStats, Result, TerrainError};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Gaussian sigma for the slope filter, in pixels.
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Default percentile above which a cell is flagged in the flow proxy.
pub const DEFAULT_FLOW_PERCENTILE: f64 = 80.0;

/// Default weight of each input in the risk blend.
pub const DEFAULT_RISK_WEIGHT: f64 = 0.5;

/// Parameters for the derived-layer pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerrainParams {
    /// Gaussian sigma for the slope filter.
    pub sigma: f64,
    /// Percentile (0-100) used as the flow-proxy threshold.
    pub flow_percentile: f64,
    /// Weight of the slope layer in the risk blend.
    pub slope_weight: f64,
    /// Weight of the flow layer in the risk blend.
    pub flow_weight: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            flow_percentile: DEFAULT_FLOW_PERCENTILE,
            slope_weight: DEFAULT_RISK_WEIGHT,
            flow_weight: DEFAULT_RISK_WEIGHT,
        }
    }
}

/// Gaussian gradient magnitude of an elevation grid.
///
/// The output has the same shape as the input and is non-negative wherever
/// the input is finite.
pub fn slope(elevation: &Array2<f32>, sigma: f64) -> Result<Array2<f64>> {
    let elevation = elevation.mapv(f64::from);
    gaussian_gradient_magnitude(&elevation, sigma, DEFAULT_TRUNCATE)
}

/// The `q`-th percentile (0-100) of all values, with linear interpolation
/// between the two nearest ranks.
///
/// Returns NaN if any value is NaN.
pub fn percentile(values: &Array2<f64>, q: f64) -> Result<f64> {
    if values.is_empty() {
        return Err(TerrainError::EmptyInput);
    }
    if !(0.0..=100.0).contains(&q) {
        return Err(TerrainError::InvalidParameter(format!(
            "percentile must be within [0, 100], got {}",
            q
        )));
    }
    if values.iter().any(|v| v.is_nan()) {
        return Ok(f64::NAN);
    }

    let mut sorted: Vec<f64> = values.iter().copied().collect();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let virtual_index = (q / 100.0) * (n - 1) as f64;
    let lower = (virtual_index.floor() as usize).min(n - 1);
    let upper = (lower + 1).min(n - 1);
    let t = virtual_index - lower as f64;

    Ok(lerp(sorted[lower], sorted[upper], t))
}

/// Linear interpolation, evaluated from whichever end is closer to `t`.
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    let diff = b - a;
    if t >= 0.5 {
        b - diff * (1.0 - t)
    } else {
        a + diff * t
    }
}

/// Binary mask of cells whose slope strictly exceeds the given percentile.
///
/// Cells above the threshold are 1.0, all others 0.0. A NaN anywhere in the
/// input makes the threshold NaN and the mask all zeros.
pub fn flow_proxy_at(slope: &Array2<f64>, q: f64) -> Result<Array2<f64>> {
    let threshold = percentile(slope, q)?;
    debug!("Flow proxy threshold (p{}): {}", q, threshold);
    Ok(slope.mapv(|s| if s > threshold { 1.0 } else { 0.0 }))
}

/// [`flow_proxy_at`] with the default 80th percentile.
pub fn flow_proxy(slope: &Array2<f64>) -> Result<Array2<f64>> {
    flow_proxy_at(slope, DEFAULT_FLOW_PERCENTILE)
}

/// `slope_weight * slope + flow_weight * flow`, cell by cell.
pub fn weighted_risk(
    slope: &Array2<f64>,
    flow: &Array2<f64>,
    slope_weight: f64,
    flow_weight: f64,
) -> Result<Array2<f64>> {
    if slope.dim() != flow.dim() {
        return Err(TerrainError::ShapeMismatch {
            expected: slope.dim(),
            found: flow.dim(),
        });
    }

    Ok(Zip::from(slope)
        .and(flow)
        .map_collect(|&s, &f| slope_weight * s + flow_weight * f))
}

/// `0.5 * slope + 0.5 * flow`, without normalizing either input.
pub fn risk(slope: &Array2<f64>, flow: &Array2<f64>) -> Result<Array2<f64>> {
    weighted_risk(slope, flow, DEFAULT_RISK_WEIGHT, DEFAULT_RISK_WEIGHT)
}

/// All derived layers for one elevation grid.
#[derive(Debug, Clone)]
pub struct DerivedLayers {
    /// Gradient magnitude.
    pub slope: Array2<f64>,
    /// High-gradient mask (0.0 or 1.0).
    pub flow: Array2<f64>,
    /// Blend of slope and flow.
    pub risk: Array2<f64>,
}

impl DerivedLayers {
    /// Compute all layers with the default parameters.
    pub fn compute(elevation: &Array2<f32>) -> Result<Self> {
        Self::compute_with(elevation, &TerrainParams::default())
    }

    /// Compute all layers with explicit parameters.
    pub fn compute_with(elevation: &Array2<f32>, params: &TerrainParams) -> Result<Self> {
        if elevation.is_empty() {
            return Err(TerrainError::EmptyInput);
        }

        let slope = slope(elevation, params.sigma)?;
        debug!("Slope: {}", LayerStats::of(&slope));

        let flow = flow_proxy_at(&slope, params.flow_percentile)?;
        debug!("Flow proxy: {}", LayerStats::of(&flow));

        let risk = weighted_risk(&slope, &flow, params.slope_weight, params.flow_weight)?;
        debug!("Risk: {}", LayerStats::of(&risk));

        Ok(Self { slope, flow, risk })
    }

    /// Shape shared by all layers (rows, cols).
    pub fn dim(&self) -> (usize, usize) {
        self.slope.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        // index = 0.8 * 3 = 2.4 -> 3 + 0.4 * (4 - 3)
        assert_relative_eq!(percentile(&values, 80.0).expect("p80"), 3.4, epsilon = 1e-12);
        assert_eq!(percentile(&values, 0.0).expect("p0"), 1.0);
        assert_eq!(percentile(&values, 100.0).expect("p100"), 4.0);
        assert_relative_eq!(percentile(&values, 50.0).expect("p50"), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_is_order_independent() {
        let a = array![[5.0, 1.0, 4.0], [2.0, 3.0, 0.0]];
        let b = array![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]];
        assert_eq!(
            percentile(&a, 80.0).expect("p80"),
            percentile(&b, 80.0).expect("p80")
        );
    }

    #[test]
    fn test_percentile_errors() {
        assert!(matches!(
            percentile(&Array2::zeros((0, 0)), 80.0),
            Err(TerrainError::EmptyInput)
        ));
        assert!(percentile(&array![[1.0]], 101.0).is_err());
        assert!(percentile(&array![[1.0]], -1.0).is_err());
        assert!(percentile(&array![[1.0, f64::NAN]], 80.0).expect("p80").is_nan());
    }

    #[test]
    fn test_flow_proxy_from_known_slope() {
        // 1..=16: index 0.8 * 15 = 12 -> threshold 13
        let slope = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c + 1) as f64);
        let flow = flow_proxy(&slope).expect("flow");

        let expected = Array2::from_shape_fn((4, 4), |(r, c)| {
            if r * 4 + c + 1 > 13 {
                1.0
            } else {
                0.0
            }
        });
        assert_eq!(flow, expected);
        assert_eq!(flow.sum(), 3.0);
    }

    #[test]
    fn test_flow_proxy_constant_slope_is_empty() {
        let flow = flow_proxy(&Array2::from_elem((3, 3), 2.0)).expect("flow");
        assert!(flow.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_flow_proxy_nan_is_empty() {
        let slope = array![[1.0, 2.0], [f64::NAN, 100.0]];
        let flow = flow_proxy(&slope).expect("flow");
        assert!(flow.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_risk_is_exact_blend() {
        let slope = array![[0.0, 1.5], [3.25, 10.0]];
        let flow = array![[0.0, 0.0], [1.0, 1.0]];
        let risk = risk(&slope, &flow).expect("risk");

        assert_eq!(risk, array![[0.0, 0.75], [2.125, 5.5]]);
    }

    #[test]
    fn test_risk_shape_mismatch() {
        let err = risk(&Array2::zeros((2, 3)), &Array2::zeros((3, 2))).unwrap_err();
        match err {
            TerrainError::ShapeMismatch { expected, found } => {
                assert_eq!(expected, (2, 3));
                assert_eq!(found, (3, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compute_rejects_empty() {
        assert!(matches!(
            DerivedLayers::compute(&Array2::zeros((0, 4))),
            Err(TerrainError::EmptyInput)
        ));
    }
}
