//! Error types for the geoscene engine crates.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Errors raised when constructing geocodings or engine inputs.
///
/// The span/graticule computations themselves never fail; they return
/// `None` for rasters without usable geocoding samples.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidRasterSize { width: usize, height: usize },

    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Tie-point grid mismatch: {0}")]
    TiePointGrid(String),
}

impl GeoError {
    /// Shorthand for an invalid-parameter error.
    pub fn parameter(param: &str, message: impl Into<String>) -> Self {
        GeoError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}
