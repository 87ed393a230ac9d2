// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File system operation failed
    FsFail(String),
    /// Required external tool is not installed
    ToolMissing(String),
    /// Media probing failed
    ProbeFail(String),
    /// Still frame extraction failed
    ExtractFail(String),
    /// Crop export failed
    CropFail(String),
    /// Replacing the source file after export failed
    ReplaceFail(String),
    /// Configuration could not be loaded or is invalid
    ConfigFail(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ToolMissing(msg) => write!(f, "{}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Could not probe video: {}", msg),
            DomainError::ExtractFail(msg) => write!(f, "Could not extract frame: {}", msg),
            DomainError::CropFail(msg) => write!(f, "Cropping failed: {}", msg),
            DomainError::ReplaceFail(msg) => write!(f, "Failed to replace file: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
