//! YAML configuration.
//!
//! Every field is optional; a missing file section falls back to its
//! defaults and unknown keys are rejected.
//!
//! ```yaml
//! fetch:
//!   api_key: demoapikeyot2022
//!   output_path: noamundi_dem.tif
//!   timeout_secs: 120
//! render:
//!   output_dir: figures
//!   font_path: /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
//! terrain:
//!   flow_percentile: 80.0
//! ```

use crate::ConfigError;
use demviz_dem::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_PATH, DEMO_API_KEY};
use demviz_render::RenderConfig;
use demviz_terrain::TerrainParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Download settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Global DEM endpoint.
    pub base_url: String,
    /// OpenTopography API key.
    pub api_key: String,
    /// Where the downloaded GeoTIFF is written.
    pub output_path: PathBuf,
    /// Request timeout; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEMO_API_KEY.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            timeout_secs: None,
        }
    }
}

impl FetchConfig {
    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fetch: FetchConfig,
    pub render: RenderConfig,
    pub terrain: TerrainParams,
}

impl Config {
    /// Parse configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null rather than an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.terrain;
        if !(t.sigma.is_finite() && t.sigma > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "terrain.sigma must be positive, got {}",
                t.sigma
            )));
        }
        if !(0.0..=100.0).contains(&t.flow_percentile) {
            return Err(ConfigError::Invalid(format!(
                "terrain.flow_percentile must be within [0, 100], got {}",
                t.flow_percentile
            )));
        }
        if self.fetch.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be non-zero".into()));
        }
        Ok(())
    }
}
