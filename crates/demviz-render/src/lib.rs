//! # demviz-render
//!
//! PNG figures for a DEM and its derived layers.
//!
//! | Layer | File | Colormap |
//! |---|---|---|
//! | 3D elevation | `dem_3d.png` | earth |
//! | 2D elevation | `dem.png` | terrain |
//! | Slope | `slope.png` | viridis |
//! | Flow | `flow.png` | Blues |
//! | Risk | `risk.png` | hot |
//!
//! Titles and colorbar labels are only drawn when a font is configured.
//!
//! ## Example
//!
//! ```no_run
//! use demviz_render::{RenderConfig, Renderer};
//! use demviz_terrain::DerivedLayers;
//! use ndarray::Array2;
//!
//! let elevation = Array2::from_shape_fn((64, 64), |(r, c)| (r + c) as f32);
//! let layers = DerivedLayers::compute(&elevation)?;
//!
//! let renderer = Renderer::from_config(&RenderConfig::default())?;
//! for path in renderer.render_all(&elevation, &layers)? {
//!     println!("wrote {}", path.display());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod colormap;
mod error;
mod figure;
mod heatmap;
mod preview;
mod surface;

pub use colormap::{Colormap, NO_DATA_COLOR};
pub use error::RenderError;
pub use figure::{load_font, Figure, FigureStyle, Layout, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use heatmap::{render_heatmap, HeatmapSpec};
pub use preview::{render_preview, PreviewFigure};
pub use surface::{render_surface, SurfaceSpec, MAX_SURFACE_SAMPLES};

use demviz_dem::GeoPoint;
use demviz_terrain::DerivedLayers;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// File name of the bounds preview figure.
pub const PREVIEW_FILE: &str = "bounds_preview.png";

const PREVIEW_TITLE: &str = "Selected Area Bounds";

/// One of the five layer figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Shaded elevation surface.
    Elevation3d,
    /// Elevation heatmap.
    Elevation,
    /// Slope percentage.
    Slope,
    /// Normalized flow proxy.
    Flow,
    /// Combined slope and flow risk.
    Risk,
}

impl Layer {
    /// All layers in rendering order.
    pub const ALL: [Layer; 5] = [
        Layer::Elevation3d,
        Layer::Elevation,
        Layer::Slope,
        Layer::Flow,
        Layer::Risk,
    ];

    /// PNG file name inside the output directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Layer::Elevation3d => "dem_3d.png",
            Layer::Elevation => "dem.png",
            Layer::Slope => "slope.png",
            Layer::Flow => "flow.png",
            Layer::Risk => "risk.png",
        }
    }

    /// Figure title, drawn only when a font is loaded.
    pub fn title(&self) -> &'static str {
        match self {
            Layer::Elevation3d => "3D DEM Visualization",
            Layer::Elevation => "DEM Data for Selected Area",
            Layer::Slope => "Slope Analysis for Selected Area",
            Layer::Flow => "Flood Risk Map for Selected Area",
            Layer::Risk => "Risk Classification Map for Selected Area",
        }
    }

    /// Text next to the colorbar.
    pub fn colorbar_label(&self) -> &'static str {
        match self {
            Layer::Elevation3d | Layer::Elevation => "Elevation (m)",
            Layer::Slope => "Slope (%)",
            Layer::Flow => "Flow Accumulation",
            Layer::Risk => "Risk Level",
        }
    }

    /// Colormap used for the layer values.
    pub fn colormap(&self) -> Colormap {
        match self {
            Layer::Elevation3d => Colormap::Earth,
            Layer::Elevation => Colormap::Terrain,
            Layer::Slope => Colormap::Viridis,
            Layer::Flow => Colormap::Blues,
            Layer::Risk => Colormap::Hot,
        }
    }

    fn heatmap_spec(&self) -> HeatmapSpec<'static> {
        HeatmapSpec {
            title: self.title(),
            colorbar_label: self.colorbar_label(),
            colormap: self.colormap(),
        }
    }
}

/// Renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Directory the PNG files are written to.
    pub output_dir: PathBuf,
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// TrueType font for titles and labels; figures have no text without one.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            font_path: None,
        }
    }
}

/// Writes layer figures into an output directory.
pub struct Renderer {
    output_dir: PathBuf,
    style: FigureStyle,
}

impl Renderer {
    /// Renderer writing into `output_dir`. The directory is created on first save.
    pub fn new(output_dir: impl Into<PathBuf>, style: FigureStyle) -> Self {
        Self {
            output_dir: output_dir.into(),
            style,
        }
    }

    /// Build a renderer, loading the font if one is configured.
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        let mut style = FigureStyle::new(config.width, config.height)?;
        match &config.font_path {
            Some(path) => style = style.with_font(load_font(path)?),
            None => warn!("No font configured; figures will be rendered without text"),
        }
        Ok(Self::new(&config.output_dir, style))
    }

    /// Directory the figures are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a layer's figure is written to.
    pub fn path_for(&self, layer: Layer) -> PathBuf {
        self.output_dir.join(layer.file_name())
    }

    /// Render the shaded 3D surface to `dem_3d.png`.
    ///
    /// Large rasters are subsampled to at most [`MAX_SURFACE_SAMPLES`] per axis.
    pub fn render_elevation_3d(&self, elevation: &Array2<f32>) -> Result<PathBuf> {
        let layer = Layer::Elevation3d;
        let spec = SurfaceSpec {
            title: layer.title(),
            colorbar_label: layer.colorbar_label(),
            colormap: layer.colormap(),
        };
        let figure = render_surface(elevation, &spec, &self.style)?;
        self.save(&figure, layer.file_name())
    }

    /// Render the elevation heatmap to `dem.png`.
    pub fn render_elevation(&self, elevation: &Array2<f32>) -> Result<PathBuf> {
        self.render_layer(Layer::Elevation, elevation)
    }

    /// Render the slope layer to `slope.png`.
    pub fn render_slope(&self, slope: &Array2<f64>) -> Result<PathBuf> {
        self.render_layer(Layer::Slope, slope)
    }

    /// Render the flow layer to `flow.png`.
    pub fn render_flow(&self, flow: &Array2<f64>) -> Result<PathBuf> {
        self.render_layer(Layer::Flow, flow)
    }

    /// Render the risk layer to `risk.png`.
    pub fn render_risk(&self, risk: &Array2<f64>) -> Result<PathBuf> {
        self.render_layer(Layer::Risk, risk)
    }

    fn render_layer<T: Copy + Into<f64>>(&self, layer: Layer, data: &Array2<T>) -> Result<PathBuf> {
        let figure = render_heatmap(data, &layer.heatmap_spec(), &self.style)?;
        self.save(&figure, layer.file_name())
    }

    /// Render all five figures in order, stopping at the first failure.
    pub fn render_all(&self, elevation: &Array2<f32>, layers: &DerivedLayers) -> Result<Vec<PathBuf>> {
        let paths = vec![
            self.render_elevation_3d(elevation)?,
            self.render_elevation(elevation)?,
            self.render_slope(&layers.slope)?,
            self.render_flow(&layers.flow)?,
            self.render_risk(&layers.risk)?,
        ];
        info!("Rendered {} figures to {}", paths.len(), self.output_dir.display());
        Ok(paths)
    }

    /// Render the bounding-box preview points.
    pub fn render_preview(&self, points: &[GeoPoint]) -> Result<PathBuf> {
        let preview = render_preview(points, PREVIEW_TITLE, &self.style)?;
        self.save(&preview.figure, PREVIEW_FILE)
    }

    fn save(&self, figure: &Figure, file_name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        figure.save(&path)?;
        info!("Wrote {}", path.display());
        Ok(path)
    }
}
