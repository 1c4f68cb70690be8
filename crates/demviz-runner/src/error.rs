//! Error types for the runner.

use demviz_dem::DemError;
use demviz_render::RenderError;
use demviz_terrain::TerrainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML or has unknown keys.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value was parsed but is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that stop a CLI command.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Bounds parsing, download, or GeoTIFF decoding failed.
    #[error(transparent)]
    Dem(#[from] DemError),

    /// Layer derivation failed.
    #[error("Terrain error: {0}")]
    Terrain(#[from] TerrainError),

    /// Font loading or writing a figure failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// `render` was pointed at a path that is not a file.
    #[error("DEM file not found: {}", .0.display())]
    DemFileNotFound(PathBuf),
}
