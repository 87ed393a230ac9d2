//! Error handling module for the cropper

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for cropper operations
#[derive(Error, Debug)]
pub enum CropperError {
    /// Input file not found or inaccessible
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    /// ffmpeg or ffprobe could not be located
    #[error("{tool} is required but was not found on PATH. Install ffmpeg and try again.")]
    ToolNotFound { tool: String },

    /// Media probe error
    #[error("Failed to probe media file: {message}")]
    ProbeError { message: String },

    /// Still frame extraction error
    #[error("Failed to extract frame: {message}")]
    FrameError { message: String },

    /// Cropping operation error
    #[error("Cropping operation failed: {message}")]
    CropError { message: String },

    /// Configuration error
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Domain rule violation
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for cropper operations
pub type CropperResult<T> = std::result::Result<T, CropperError>;

impl From<CropperError> for DomainError {
    fn from(err: CropperError) -> Self {
        match err {
            CropperError::Domain(inner) => inner,
            CropperError::ToolNotFound { .. } => DomainError::ToolMissing(err.to_string()),
            CropperError::InputFileNotFound { .. } | CropperError::IoError(_) => {
                DomainError::FsFail(err.to_string())
            }
            CropperError::ProbeError { message } => DomainError::ProbeFail(message),
            CropperError::JsonError(e) => DomainError::ProbeFail(e.to_string()),
            CropperError::FrameError { message } => DomainError::ExtractFail(message),
            CropperError::CropError { message } => DomainError::CropFail(message),
            CropperError::ConfigError { message } => DomainError::ConfigFail(message),
        }
    }
}
