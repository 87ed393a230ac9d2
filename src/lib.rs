//! Video Cropper Library
//!
//! Maps crop rectangles between a letterboxed editor canvas and source
//! video pixels, and drives ffprobe/ffmpeg to inspect, preview and export
//! the cropped video.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{AspectPreset, AspectRatio, CanvasRect, CanvasSize, CropBox, ImageSize, VideoMetadata};
pub use domain::session::CropSession;
pub use error::{CropperError, CropperResult};
