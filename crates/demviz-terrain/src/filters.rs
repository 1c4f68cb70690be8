//! Separable Gaussian filters over 2D grids.
//!
//! Boundaries use half-sample symmetric reflection (`d c b a | a b c d`),
//! repeated as often as needed when the kernel is wider than the grid.
//! Symmetric and antisymmetric kernels are evaluated pairwise, summing the
//! outermost pair first.

use crate::{Result, TerrainError};
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis, Zip};

/// Kernel half-width in standard deviations.
pub const DEFAULT_TRUNCATE: f64 = 4.0;

/// One side of a symmetric or antisymmetric 1D correlation kernel.
///
/// `weights[j]` is the weight applied at offset `+j`. For a symmetric kernel
/// the weight at `-j` is the same; for an antisymmetric kernel it is negated.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel1d {
    weights: Vec<f64>,
    antisymmetric: bool,
}

impl Kernel1d {
    /// Normalized Gaussian (order 0) or its first derivative (order 1).
    pub fn gaussian(sigma: f64, order: u8, truncate: f64) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(TerrainError::InvalidParameter(format!(
                "sigma must be positive and finite, got {}",
                sigma
            )));
        }
        if !truncate.is_finite() || truncate < 0.0 {
            return Err(TerrainError::InvalidParameter(format!(
                "truncate must be non-negative and finite, got {}",
                truncate
            )));
        }

        let radius = (truncate * sigma + 0.5) as usize;
        let sigma2 = sigma * sigma;

        let phi: Vec<f64> = (0..=radius)
            .map(|x| (-0.5 / sigma2 * (x * x) as f64).exp())
            .collect();
        let sum = phi[0] + 2.0 * phi[1..].iter().sum::<f64>();
        let phi: Vec<f64> = phi.into_iter().map(|v| v / sum).collect();

        match order {
            0 => Ok(Self {
                weights: phi,
                antisymmetric: false,
            }),
            1 => Ok(Self {
                weights: phi
                    .iter()
                    .enumerate()
                    .map(|(x, p)| x as f64 / sigma2 * p)
                    .collect(),
                antisymmetric: true,
            }),
            _ => Err(TerrainError::InvalidParameter(format!(
                "only derivative orders 0 and 1 are supported, got {}",
                order
            ))),
        }
    }

    /// Kernel radius (number of cells on each side of the center).
    pub fn radius(&self) -> usize {
        self.weights.len() - 1
    }

    /// Weights at offsets `0..=radius`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Correlate one line of input into `output`.
    fn apply_line(&self, input: ArrayView1<f64>, mut output: ArrayViewMut1<f64>) {
        let n = input.len();
        let r = self.radius();

        let extended: Vec<f64> = (0..n + 2 * r)
            .map(|k| input[reflect_index(k as isize - r as isize, n)])
            .collect();

        for (i, out) in output.iter_mut().enumerate() {
            let c = i + r;
            let mut acc = extended[c] * self.weights[0];
            for j in (1..=r).rev() {
                let pair = if self.antisymmetric {
                    extended[c + j] - extended[c - j]
                } else {
                    extended[c + j] + extended[c - j]
                };
                acc += pair * self.weights[j];
            }
            *out = acc;
        }
    }

    /// Correlate every lane of `input` along `axis`.
    pub fn apply_along(&self, input: &Array2<f64>, axis: Axis) -> Array2<f64> {
        let mut output = Array2::<f64>::zeros(input.raw_dim());
        if input.is_empty() {
            return output;
        }

        Zip::from(output.lanes_mut(axis))
            .and(input.lanes(axis))
            .for_each(|out, inp| self.apply_line(inp, out));

        output
    }
}

/// Map an out-of-range index into `0..n` by half-sample symmetric reflection.
fn reflect_index(idx: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = idx.rem_euclid(period);
    if m >= n as isize {
        (period - 1 - m) as usize
    } else {
        m as usize
    }
}

/// Gaussian smoothing with an optional first derivative along each axis.
///
/// `orders[0]` applies to rows-direction (axis 0), `orders[1]` to columns.
/// Axes are filtered in order, each pass feeding the next.
pub fn gaussian_filter(
    input: &Array2<f64>,
    sigma: f64,
    orders: [u8; 2],
    truncate: f64,
) -> Result<Array2<f64>> {
    let mut output = input.clone();
    for (axis, order) in orders.iter().enumerate() {
        let kernel = Kernel1d::gaussian(sigma, *order, truncate)?;
        output = kernel.apply_along(&output, Axis(axis));
    }
    Ok(output)
}

/// Magnitude of the Gaussian-smoothed gradient, `sqrt(gy² + gx²)`.
pub fn gaussian_gradient_magnitude(
    input: &Array2<f64>,
    sigma: f64,
    truncate: f64,
) -> Result<Array2<f64>> {
    let mut output = gaussian_filter(input, sigma, [1, 0], truncate)?;
    output.mapv_inplace(|v| v * v);

    let gx = gaussian_filter(input, sigma, [0, 1], truncate)?;
    Zip::from(&mut output).and(&gx).for_each(|o, &g| *o += g * g);

    output.mapv_inplace(f64::sqrt);
    Ok(output)
}
