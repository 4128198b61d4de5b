//! Error types for the raster map service.

use thiserror::Error;

use crate::bbox::BboxParseError;

/// Result type alias using MapError.
pub type MapResult<T> = Result<T, MapError>;

/// Primary error type for map operations.
#[derive(Debug, Error)]
pub enum MapError {
    // === Request Validation Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Requested format not supported: {0}")]
    UnsupportedFormat(String),

    // === Layer Data Errors ===
    #[error("Invalid world file: {0}")]
    WorldFileParse(String),

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl MapError {
    /// Get the OGC WMS exception code for this error.
    pub fn wms_exception_code(&self) -> &'static str {
        match self {
            MapError::MissingParameter(_) => "MissingParameterValue",
            MapError::InvalidParameter { .. } => "InvalidParameterValue",
            MapError::InvalidBbox(_) => "InvalidBBox",
            MapError::LayerNotFound(_) => "LayerNotDefined",
            MapError::UnsupportedFormat(_) => "InvalidFormat",
            _ => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            MapError::MissingParameter(_)
            | MapError::InvalidParameter { .. }
            | MapError::InvalidBbox(_)
            | MapError::UnsupportedFormat(_) => 400,

            MapError::LayerNotFound(_) => 404,

            _ => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        MapError::InternalError(err.to_string())
    }
}

impl From<BboxParseError> for MapError {
    fn from(err: BboxParseError) -> Self {
        MapError::InvalidBbox(err.to_string())
    }
}
