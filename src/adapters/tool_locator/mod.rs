//! Locating the ffmpeg and ffprobe executables
//!
//! An explicitly configured path wins; otherwise the tool is looked up on
//! `PATH`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CropperError, CropperResult};

/// External tools the cropper shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
}

impl Tool {
    pub fn binary_name(&self) -> &'static str {
        match self {
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
        }
    }
}

/// Resolve a tool to an executable path
pub fn locate(tool: Tool, configured: Option<&Path>) -> CropperResult<PathBuf> {
    let not_found = || CropperError::ToolNotFound {
        tool: tool.binary_name().to_string(),
    };

    let resolved = match configured {
        Some(path) if path.is_file() => path.to_path_buf(),
        // A bare name such as "ffmpeg-6" is still looked up on PATH
        Some(path) => which::which(path).map_err(|_| not_found())?,
        None => which::which(tool.binary_name()).map_err(|_| not_found())?,
    };

    debug!(tool = tool.binary_name(), path = %resolved.display(), "Located tool");
    Ok(resolved)
}
