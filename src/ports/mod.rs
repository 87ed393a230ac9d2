// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Duration and primary stream dimensions of a video file
    async fn probe(&self, path: &Path) -> Result<VideoMetadata, DomainError>;
}

/// Port for still frame extraction
#[async_trait]
pub trait FramePort: Send + Sync {
    /// Write the frame at `timestamp` seconds to `output`
    async fn extract_frame(
        &self,
        input: &Path,
        output: &Path,
        timestamp: f64,
    ) -> Result<(), DomainError>;

    /// Write the cropped frame at `timestamp` seconds to `output`
    async fn extract_cropped_frame(
        &self,
        input: &Path,
        output: &Path,
        timestamp: f64,
        crop: &CropBox,
    ) -> Result<(), DomainError>;
}

/// Port for exporting a cropped video
#[async_trait]
pub trait CropPort: Send + Sync {
    /// Crop `input` into `output`, reporting progress lines to `progress`
    async fn crop_video(
        &self,
        input: &Path,
        output: &Path,
        crop: &CropBox,
        progress: &dyn LogPort,
    ) -> Result<(), DomainError>;
}

/// Port for a media player that can snapshot its current frame.
///
/// Optional: callers fall back to [`FramePort`] when none is wired in or
/// when it reports no snapshot.
#[async_trait]
pub trait SnapshotPort: Send + Sync {
    /// Seek to `timestamp` if given and write the current frame to `output`.
    /// Returns `Ok(false)` when no frame could be captured.
    async fn snapshot(&self, output: &Path, timestamp: Option<f64>) -> Result<bool, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, path: &Path) -> Result<bool, DomainError>;

    /// Get file size
    async fn file_size(&self, path: &Path) -> Result<u64, DomainError>;

    /// Directory for preview stills, removed when the adapter is dropped
    fn preview_dir(&self) -> &Path;

    /// Create the parent directories of `path`
    async fn ensure_parent_dir(&self, path: &Path) -> Result<(), DomainError>;

    /// Reserve an empty temp file next to `target`, keeping its extension
    async fn create_sibling_temp(&self, target: &Path) -> Result<PathBuf, DomainError>;

    /// Delete a file; a missing file is not an error
    async fn remove_file(&self, path: &Path) -> Result<(), DomainError>;

    /// Replace `target` with `replacement`
    async fn replace_file(&self, replacement: &Path, target: &Path) -> Result<(), DomainError>;
}

/// Port for the user-facing log (the editor's log pane)
pub trait LogPort: Send + Sync {
    /// Log a message at the given level
    fn log(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Effective application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Explicit ffmpeg binary; looked up on PATH when unset
    pub ffmpeg_path: Option<PathBuf>,
    /// Explicit ffprobe binary; looked up on PATH when unset
    pub ffprobe_path: Option<PathBuf>,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Timestamp used for cropped preview stills
    pub preview_timestamp: f64,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            ffprobe_path: None,
            canvas_width: CanvasSize::DEFAULT.width,
            canvas_height: CanvasSize::DEFAULT.height,
            preview_timestamp: 1.0,
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    /// Canvas the editor session starts with
    pub fn canvas(&self) -> Result<CanvasSize, DomainError> {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }
}

/// Port for configuration management
pub trait ConfigPort: Send + Sync {
    /// Snapshot of the current configuration
    fn current(&self) -> AppConfig;

    /// Set a single key from its string form
    fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Merge a configuration file over the current values
    fn load_config(&self, path: &Path) -> Result<(), DomainError>;

    /// Validate the current values
    fn validate_config(&self) -> Result<(), DomainError>;

    /// File the configuration was loaded from, if any
    fn config_file_path(&self) -> Option<PathBuf>;
}
