//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe` with JSON output and reads the container duration plus
//! the dimensions of the primary video stream.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::adapters::tool_locator::{self, Tool};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{CropperError, CropperResult};
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    format_name: Option<String>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    configured_path: Option<PathBuf>,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter; the binary is resolved on first use
    pub fn new(configured_path: Option<PathBuf>) -> Result<Self, DomainError> {
        Ok(Self { configured_path })
    }

    async fn run(&self, path: &Path) -> CropperResult<VideoMetadata> {
        if !path.is_file() {
            return Err(CropperError::InputFileNotFound {
                path: path.display().to_string(),
            });
        }

        let ffprobe = tool_locator::locate(Tool::Ffprobe, self.configured_path.as_deref())?;
        let output = Command::new(&ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-show_streams",
                "-print_format",
                "json",
            ])
            .arg(path)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CropperError::ProbeError {
                message: format!("ffprobe exited with {}: {}", output.status, stderr.trim()),
            });
        }

        parse_probe_output(path, &String::from_utf8_lossy(&output.stdout))
    }
}

/// Build metadata from `ffprobe -print_format json` output
pub fn parse_probe_output(path: &Path, json: &str) -> CropperResult<VideoMetadata> {
    let parsed: ProbeOutput = serde_json::from_str(json)?;

    let format = parsed.format.ok_or_else(|| CropperError::ProbeError {
        message: "ffprobe output has no format section".to_string(),
    })?;
    let duration = format
        .duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| CropperError::ProbeError {
            message: "ffprobe output has no usable duration".to_string(),
        })?;

    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .or_else(|| parsed.streams.first())
        .ok_or_else(|| CropperError::ProbeError {
            message: "no streams found".to_string(),
        })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(CropperError::ProbeError {
                message: "primary stream has no dimensions".to_string(),
            })
        }
    };

    Ok(VideoMetadata {
        path: path.to_path_buf(),
        duration,
        width,
        height,
        format_name: format.format_name,
        codec: stream.codec_name.clone(),
    })
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    #[instrument(skip_all, fields(path = %path.display()))]
    async fn probe(&self, path: &Path) -> Result<VideoMetadata, DomainError> {
        let metadata = self.run(path).await?;
        debug!(
            width = metadata.width,
            height = metadata.height,
            duration = metadata.duration,
            "Probed video"
        );
        Ok(metadata)
    }
}
