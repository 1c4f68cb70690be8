//! Error types for the terrain crate.

use thiserror::Error;

/// Errors that can occur when deriving terrain layers.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// The input array has no cells.
    #[error("Input array is empty")]
    EmptyInput,

    /// Two arrays that must be combined cellwise differ in shape.
    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Shape of the first operand (rows, cols).
        expected: (usize, usize),
        /// Shape of the second operand (rows, cols).
        found: (usize, usize),
    },

    /// A filter or threshold parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
