//! Error types for the DEM crate.

use thiserror::Error;

/// Errors that can occur when requesting, fetching, or loading DEM data.
#[derive(Debug, Error)]
pub enum DemError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Invalid GeoTIFF contents (e.g. an image without pixels).
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// A bounding-box text field could not be parsed as a number.
    #[error("Invalid coordinate for {field}: '{value}' is not a number")]
    InvalidCoordinate {
        /// Name of the field (south, north, west, east).
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },

    /// The bounding box is numerically valid but geographically unusable.
    #[error("Invalid bounding box: {0}")]
    InvalidBounds(String),

    /// Unknown DEM product identifier.
    #[error("Unknown DEM type '{0}'")]
    UnknownDemType(String),

    /// HTTP transport error.
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Failed to download DEM: HTTP {status}: {reason}")]
    DownloadFailed {
        /// HTTP status code.
        status: u16,
        /// Reason phrase or response excerpt.
        reason: String,
    },
}
