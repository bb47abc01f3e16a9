//! Error types for onsetplot.
//!
//! Every fallible operation in the crate returns [`Result`], and failures are
//! propagated unchanged to the caller.

use thiserror::Error;

/// The main error type for onsetplot operations.
#[derive(Error, Debug)]
pub enum PlotError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A coordinate (or any of its aliases) is missing from a field
    #[error("Coordinate not found: {name}")]
    CoordinateNotFound { name: String },

    /// A variable is missing from a data file
    #[error("Variable not found: {name}")]
    VariableNotFound { name: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Array shape errors
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// No finite values where some were required
    #[error("Empty data: {message}")]
    EmptyData { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlotError {
    /// Shorthand for an [`PlotError::InvalidParameter`]
    pub fn invalid(param: &str, message: impl Into<String>) -> Self {
        PlotError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with PlotError
pub type Result<T> = std::result::Result<T, PlotError>;
