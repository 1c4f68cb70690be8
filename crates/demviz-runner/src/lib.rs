//! # demviz-runner
//!
//! Wires the DEM download, derived-layer, and rendering crates into the
//! `demviz` command-line tool.
//!
//! The stages can also be driven directly through [`Pipeline`], which is
//! generic over the HTTP transport so it can run without network access:
//!
//! ```no_run
//! use demviz_dem::{BoundsInput, DemType};
//! use demviz_runner::{Config, Pipeline};
//!
//! let config = Config::load("demviz.yaml")?;
//! let pipeline = Pipeline::from_config(&config)?;
//! let result = pipeline.run(&BoundsInput::default(), DemType::Srtmgl3)?;
//! println!("{} figures", result.figures.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
mod error;
pub mod logging;
mod pipeline;

pub use config::{Config, FetchConfig};
pub use error::{ConfigError, RunnerError};
pub use pipeline::{Pipeline, PreviewResult, RenderResult};

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
