//! Single-band DEM raster loaded from a GeoTIFF.

use crate::{DemError, Result};
use ndarray::Array2;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::debug;

/// GeoTIFF ModelPixelScaleTag.
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepointTag.
const TAG_MODEL_TIEPOINT: u16 = 33922;
/// GDAL_NODATA, stored as an ASCII string.
const TAG_GDAL_NODATA: u16 = 42113;

/// Geographic extent of a raster, from its GeoTIFF tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterBounds {
    /// Minimum latitude (south edge).
    pub min_lat: f64,
    /// Maximum latitude (north edge).
    pub max_lat: f64,
    /// Minimum longitude (west edge).
    pub min_lon: f64,
    /// Maximum longitude (east edge).
    pub max_lon: f64,
}

/// Elevation values of band 1 of a GeoTIFF.
///
/// Row 0 is the first image row (north for north-up rasters).
#[derive(Debug, Clone)]
pub struct DemRaster {
    /// Elevation grid, `rows x cols`.
    data: Array2<f32>,
    /// Georeferencing, if the file carries tiepoint and pixel-scale tags.
    bounds: Option<RasterBounds>,
    /// No-data value, if the file declares one.
    no_data_value: Option<f32>,
}

impl DemRaster {
    /// Wrap an existing elevation grid without georeferencing.
    pub fn from_array(data: Array2<f32>) -> Self {
        Self {
            data,
            bounds: None,
            no_data_value: None,
        }
    }

    /// Load band 1 of a GeoTIFF file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading DEM raster from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Load band 1 of a GeoTIFF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut decoder = Decoder::new(reader)?;

        // Global DEM products can be large; raise the default limits.
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.intermediate_buffer_size = 1024 * 1024 * 1024; // 1 GB
        limits.ifd_value_size = 1024 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        if width == 0 || height == 0 {
            return Err(DemError::InvalidGeoTiff(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let bounds = Self::read_geotransform(&mut decoder, width, height);
        let no_data_value = Self::read_nodata_value(&mut decoder);
        let samples = Self::decode_samples(&mut decoder)?;

        let pixels = width as usize * height as usize;
        if samples.is_empty() || samples.len() % pixels != 0 {
            return Err(DemError::InvalidGeoTiff(format!(
                "{} samples do not fit a {}x{} image",
                samples.len(),
                width,
                height
            )));
        }

        // Chunky multi-sample images interleave bands; keep band 1 only.
        let samples_per_pixel = samples.len() / pixels;
        let band1: Vec<f32> = if samples_per_pixel == 1 {
            samples
        } else {
            samples.into_iter().step_by(samples_per_pixel).collect()
        };

        let data = Array2::from_shape_vec((height as usize, width as usize), band1)
            .map_err(|e| DemError::InvalidGeoTiff(e.to_string()))?;

        debug!(
            "Loaded {}x{} raster ({} sample(s) per pixel), bounds {:?}, no-data {:?}",
            width, height, samples_per_pixel, bounds, no_data_value
        );

        Ok(Self {
            data,
            bounds,
            no_data_value,
        })
    }

    /// Read the geographic extent from ModelTiepoint and ModelPixelScale.
    fn read_geotransform<R: Read + Seek>(
        decoder: &mut Decoder<R>,
        width: u32,
        height: u32,
    ) -> Option<RasterBounds> {
        let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT)).ok()?;
        let scale = decoder.get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE)).ok()?;

        if tiepoint.len() < 6 || scale.len() < 2 {
            return None;
        }

        // Tiepoint format: [i, j, k, x, y, z]; (x, y) is the top-left corner
        let tie_x = tiepoint[3];
        let tie_y = tiepoint[4];

        Some(RasterBounds {
            min_lat: tie_y - (height as f64 * scale[1]),
            max_lat: tie_y,
            min_lon: tie_x,
            max_lon: tie_x + (width as f64 * scale[0]),
        })
    }

    fn read_nodata_value<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
        decoder
            .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
            .ok()
            .and_then(|s| s.trim().trim_end_matches('\0').parse().ok())
    }

    fn decode_samples<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Vec<f32>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::F32(data) => Ok(data),
            DecodingResult::F64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
        }
    }

    /// The elevation grid.
    pub fn elevation(&self) -> &Array2<f32> {
        &self.data
    }

    /// Consume the raster and return its elevation grid.
    pub fn into_elevation(self) -> Array2<f32> {
        self.data
    }

    /// Get the geographic bounds, if known.
    pub fn bounds(&self) -> Option<RasterBounds> {
        self.bounds
    }

    /// Get the no-data value, if declared.
    pub fn no_data_value(&self) -> Option<f32> {
        self.no_data_value
    }

    /// Get the dimensions as `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        let (rows, cols) = self.data.dim();
        (cols as u32, rows as u32)
    }
}
