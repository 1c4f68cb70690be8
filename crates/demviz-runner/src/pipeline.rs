//! The preview, download, and render stages wired together.

use crate::config::Config;
use crate::{Result, RunnerError};
use demviz_dem::{
    preview_points, BoundsInput, DemFetcher, DemRaster, DemRequest, DemType, FetchOutcome,
    GeoPoint, HttpTransport, ReqwestTransport,
};
use demviz_render::{RenderConfig, Renderer};
use demviz_terrain::{DerivedLayers, LayerStats, TerrainParams};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Parsed bounds and the file the preview was written to.
#[derive(Debug)]
pub struct PreviewResult {
    pub points: [GeoPoint; 4],
    pub path: PathBuf,
}

/// Everything produced by a render.
#[derive(Debug)]
pub struct RenderResult {
    /// Raster dimensions (width, height).
    pub dimensions: (u32, u32),
    /// Figures in rendering order.
    pub figures: Vec<PathBuf>,
}

/// Runs the stages with one configuration.
pub struct Pipeline<T: HttpTransport> {
    fetcher: DemFetcher<T>,
    render: RenderConfig,
    terrain: TerrainParams,
    base_url: String,
    api_key: String,
}

impl Pipeline<ReqwestTransport> {
    /// Build a pipeline with a real HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(config.fetch.timeout())?;
        Self::with_transport(config, transport)
    }
}

impl<T: HttpTransport> Pipeline<T> {
    /// Build a pipeline around the given transport.
    ///
    /// The renderer and its font are only loaded by the stages that draw.
    pub fn with_transport(config: &Config, transport: T) -> Result<Self> {
        let fetcher = DemFetcher::with_transport(transport).with_output_path(&config.fetch.output_path);
        Ok(Self {
            fetcher,
            render: config.render.clone(),
            terrain: config.terrain,
            base_url: config.fetch.base_url.clone(),
            api_key: config.fetch.api_key.clone(),
        })
    }

    /// Replace the download destination.
    pub fn with_output_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.fetcher = self.fetcher.with_output_path(path);
        self
    }

    /// Where `download` writes the GeoTIFF.
    pub fn output_path(&self) -> &Path {
        self.fetcher.output_path()
    }

    /// Parse the bounds text and plot the four preview points.
    ///
    /// Ordering is not checked here; only the text must be numeric.
    pub fn preview(&self, input: &BoundsInput) -> Result<PreviewResult> {
        let bounds = input.parse()?;
        let points = preview_points(&bounds);
        let path = self.renderer()?.render_preview(&points)?;
        Ok(PreviewResult { points, path })
    }

    /// Build a validated request from raw bounds text.
    pub fn request(&self, input: &BoundsInput, dem_type: DemType) -> Result<DemRequest> {
        let bounds = input.parse()?;
        let request = DemRequest::new(bounds, dem_type)?
            .with_base_url(&self.base_url)
            .with_api_key(&self.api_key);
        Ok(request)
    }

    /// Download the requested DEM to the output path.
    pub fn fetch(&self, request: &DemRequest) -> Result<FetchOutcome> {
        Ok(self.fetcher.fetch_dem(request)?)
    }

    /// Download the DEM for the given bounds to the output path.
    pub fn download(&self, input: &BoundsInput, dem_type: DemType) -> Result<FetchOutcome> {
        let request = self.request(input, dem_type)?;
        self.fetch(&request)
    }

    /// Load the DEM at `path`, derive the layers, and render all figures.
    pub fn render_file(&self, path: &Path) -> Result<RenderResult> {
        if !path.is_file() {
            return Err(RunnerError::DemFileNotFound(path.to_path_buf()));
        }
        let renderer = self.renderer()?;
        let raster = DemRaster::from_file(path)?;
        info!("Loaded DEM {} ({:?})", path.display(), raster.dimensions());
        self.render_with(&renderer, &raster)
    }

    /// Derive the layers for an in-memory raster and render all figures.
    pub fn render_raster(&self, raster: &DemRaster) -> Result<RenderResult> {
        self.render_with(&self.renderer()?, raster)
    }

    /// Download, then render the downloaded bytes without re-reading the file.
    ///
    /// The font is loaded before anything is downloaded.
    pub fn run(&self, input: &BoundsInput, dem_type: DemType) -> Result<RenderResult> {
        let renderer = self.renderer()?;
        let outcome = self.download(input, dem_type)?;
        let raster = DemRaster::from_bytes(&outcome.bytes)?;
        self.render_with(&renderer, &raster)
    }

    fn renderer(&self) -> Result<Renderer> {
        Ok(Renderer::from_config(&self.render)?)
    }

    fn render_with(&self, renderer: &Renderer, raster: &DemRaster) -> Result<RenderResult> {
        let elevation = raster.elevation();
        debug!("Elevation: {}", LayerStats::of(elevation));

        let layers = DerivedLayers::compute_with(elevation, &self.terrain)?;
        let figures = renderer.render_all(elevation, &layers)?;
        Ok(RenderResult {
            dimensions: raster.dimensions(),
            figures,
        })
    }
}
