//! # demviz-dem
//!
//! Bounding-box DEM requests, GeoTIFF download, and raster loading.
//!
//! This crate covers the first half of the demviz pipeline:
//! - Parsing raw bounding-box text into a [`BoundingBox`]
//! - Building a validated [`DemRequest`] for one of the OpenTopography
//!   global DEM products ([`DemType`])
//! - Downloading the GeoTIFF with a [`DemFetcher`] and writing it to disk
//! - Decoding band 1 into a [`DemRaster`]
//!
//! ## Example
//!
//! ```no_run
//! use demviz_dem::{BoundsInput, DemFetcher, DemRaster, DemRequest, DemType};
//!
//! let bounds = BoundsInput::new("22.0", "22.5", "85.4", "85.8").parse()?;
//! let request = DemRequest::new(bounds, DemType::Srtmgl3)?;
//!
//! let fetcher = DemFetcher::new()?.with_output_path("noamundi_dem.tif");
//! let outcome = fetcher.fetch_dem(&request)?;
//!
//! let raster = DemRaster::from_bytes(&outcome.bytes)?;
//! println!("DEM is {:?} pixels", raster.dimensions());
//! # Ok::<(), demviz_dem::DemError>(())
//! ```

mod bounds;
mod error;
mod fetch;
mod raster;
mod request;

pub use bounds::{preview_points, BoundingBox, BoundsInput, GeoPoint};
pub use error::DemError;
pub use fetch::{
    DemFetcher, FetchOutcome, HttpResponse, HttpTransport, ReqwestTransport, DEFAULT_OUTPUT_PATH,
};
pub use raster::{DemRaster, RasterBounds};
pub use request::{DemRequest, DemType, DEFAULT_BASE_URL, DEMO_API_KEY};

/// Result type for DEM operations.
pub type Result<T> = std::result::Result<T, DemError>;
