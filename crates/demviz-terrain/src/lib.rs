//! # demviz-terrain
//!
//! Derived terrain layers computed from a DEM elevation grid.
//!
//! ## Layers
//!
//! - **Slope**: Gaussian gradient magnitude (sigma = 1 by default). Values
//!   are elevation change per pixel, not percent slope.
//! - **Flow proxy**: 1.0 where slope strictly exceeds its 80th percentile,
//!   0.0 elsewhere. A stand-in for flow accumulation.
//! - **Risk**: `0.5 * slope + 0.5 * flow`, with no normalization.
//!
//! ## Example
//!
//! ```
//! use demviz_terrain::DerivedLayers;
//! use ndarray::Array2;
//!
//! let elevation = Array2::from_shape_fn((8, 8), |(r, c)| (r * r + c) as f32);
//! let layers = DerivedLayers::compute(&elevation)?;
//!
//! assert_eq!(layers.dim(), (8, 8));
//! assert!(layers.slope.iter().all(|&s| s >= 0.0));
//! # Ok::<(), demviz_terrain::TerrainError>(())
//! ```

mod error;
pub mod filters;
mod layers;
mod stats;

pub use error::TerrainError;
pub use layers::{
    flow_proxy, flow_proxy_at, percentile, risk, slope, weighted_risk, DerivedLayers,
    TerrainParams, DEFAULT_FLOW_PERCENTILE, DEFAULT_RISK_WEIGHT, DEFAULT_SIGMA,
};
pub use stats::LayerStats;

/// Result type for terrain operations.
pub type Result<T> = std::result::Result<T, TerrainError>;
