//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while rendering or saving a figure.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Image encoding or saving error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (creating the output directory, reading a font).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured font could not be parsed.
    #[error("Invalid font: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),

    /// The font file does not exist.
    #[error("Font not found: {0}")]
    FontNotFound(String),

    /// Figure or plot area too small to draw into.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The layer has no cells.
    #[error("Cannot render empty layer '{0}'")]
    EmptyLayer(String),
}
