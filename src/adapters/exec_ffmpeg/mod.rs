//! FFmpeg execution adapter
//!
//! Shells out to `ffmpeg` for still frame extraction and for the crop
//! export itself. Export progress is read from `-progress pipe:1` and
//! translated into log lines as it arrives.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::adapters::tool_locator::{self, Tool};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{CropperError, CropperResult};
use crate::ports::*;
use crate::utils::time::format_timecode;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    configured_path: Option<PathBuf>,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter; the binary is resolved on first use
    pub fn new(configured_path: Option<PathBuf>) -> Result<Self, DomainError> {
        Ok(Self { configured_path })
    }

    fn ffmpeg(&self) -> CropperResult<PathBuf> {
        tool_locator::locate(Tool::Ffmpeg, self.configured_path.as_deref())
    }

    async fn run_still(&self, args: Vec<OsString>, output: &Path) -> CropperResult<()> {
        let ffmpeg = self.ffmpeg()?;
        // A leftover still would hide a seek that wrote nothing
        match tokio::fs::remove_file(output).await {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        debug!(?args, "Running ffmpeg");

        let result = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(CropperError::FrameError {
                message: format!("ffmpeg exited with {}: {}", result.status, last_line(&stderr)),
            });
        }
        // Seeking past the end exits cleanly without writing anything
        if !output.is_file() {
            return Err(CropperError::FrameError {
                message: "ffmpeg produced no frame at that timestamp".to_string(),
            });
        }
        Ok(())
    }

    async fn run_crop(
        &self,
        input: &Path,
        output: &Path,
        crop: &CropBox,
        progress: &dyn LogPort,
    ) -> CropperResult<()> {
        if !input.is_file() {
            return Err(CropperError::InputFileNotFound {
                path: input.display().to_string(),
            });
        }

        let ffmpeg = self.ffmpeg()?;
        let args = crop_args(input, output, crop);
        debug!(?args, "Running ffmpeg");

        let mut child = Command::new(&ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| CropperError::CropError {
            message: "ffmpeg stdout was not captured".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| CropperError::CropError {
            message: "ffmpeg stderr was not captured".to_string(),
        })?;

        let mut out_reader = BufReader::new(stdout);
        let mut err_reader = BufReader::new(stderr);
        let (mut out_buf, mut err_buf) = (Vec::new(), Vec::new());
        let mut last_stderr = String::new();
        let (mut out_done, mut err_done) = (false, false);

        while !(out_done && err_done) {
            tokio::select! {
                line = read_line_lossy(&mut out_reader, &mut out_buf), if !out_done => match line? {
                    Some(line) => forward_progress(&line, progress),
                    None => out_done = true,
                },
                line = read_line_lossy(&mut err_reader, &mut err_buf), if !err_done => match line? {
                    Some(line) => {
                        forward_progress(&line, progress);
                        if !line.trim().is_empty() {
                            last_stderr = line;
                        }
                    }
                    None => err_done = true,
                },
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            warn!(%status, "ffmpeg crop failed");
            let mut message = format!("ffmpeg exited with {}", status);
            if !last_stderr.is_empty() {
                message.push_str(": ");
                message.push_str(last_stderr.trim());
            }
            return Err(CropperError::CropError { message });
        }

        info!(output = %output.display(), "Crop finished");
        Ok(())
    }
}

/// Next line of child output, with invalid UTF-8 replaced.
///
/// Partial reads stay in `buf` when a `select!` branch is cancelled, so the
/// same buffer must be passed on every call.
async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

fn forward_progress(line: &str, progress: &dyn LogPort) {
    if let Some(message) = translate_progress_line(line) {
        if message.starts_with("ffmpeg: ") {
            progress.error(&message);
        } else {
            progress.info(&message);
        }
    }
}

fn last_line(text: &str) -> &str {
    text.lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(str::trim)
        .unwrap_or("no output")
}

fn seconds_arg(seconds: f64) -> String {
    format!("{:.3}", seconds.max(0.0))
}

/// `ffmpeg -y -ss <t> -i <input> -vframes 1 <output>`
pub fn frame_args(input: &Path, output: &Path, timestamp: f64) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-ss".into(),
        seconds_arg(timestamp).into(),
        "-i".into(),
        input.into(),
        "-vframes".into(),
        "1".into(),
        output.into(),
    ]
}

/// Like [`frame_args`] with a crop filter applied to the still
pub fn cropped_frame_args(input: &Path, output: &Path, timestamp: f64, crop: &CropBox) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-ss".into(),
        seconds_arg(timestamp).into(),
        "-i".into(),
        input.into(),
        "-filter:v".into(),
        crop.as_filter().into(),
        "-vframes".into(),
        "1".into(),
        output.into(),
    ]
}

/// Crop export with audio stream-copied and machine-readable progress on stdout
pub fn crop_args(input: &Path, output: &Path, crop: &CropBox) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-filter:v".into(),
        crop.as_filter().into(),
        "-c:a".into(),
        "copy".into(),
        "-progress".into(),
        "pipe:1".into(),
        "-nostats".into(),
        "-loglevel".into(),
        "error".into(),
        output.into(),
    ]
}

/// Turn one line of ffmpeg output into a human-readable log line.
///
/// Returns `None` for lines that carry nothing worth showing.
pub fn translate_progress_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some(value) = line.strip_prefix("out_time_ms=") {
        // Despite the name, the value is in microseconds
        return Some(match value.trim().parse::<i64>() {
            Ok(micros) => format!(
                "Processing timestamp: {}",
                format_timecode(micros as f64 / 1_000_000.0)
            ),
            Err(_) => line.to_string(),
        });
    }

    if line == "progress=end" {
        return Some("ffmpeg processing complete.".to_string());
    }

    if line.to_lowercase().contains("error") {
        return Some(format!("ffmpeg: {}", line));
    }

    None
}

#[async_trait]
impl FramePort for FFmpegAdapter {
    #[instrument(skip_all, fields(input = %input.display(), timestamp = timestamp))]
    async fn extract_frame(
        &self,
        input: &Path,
        output: &Path,
        timestamp: f64,
    ) -> Result<(), DomainError> {
        if !input.is_file() {
            return Err(DomainError::FsFail(format!(
                "Input file not found: {}",
                input.display()
            )));
        }
        self.run_still(frame_args(input, output, timestamp), output)
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(input = %input.display(), timestamp = timestamp, crop = %crop))]
    async fn extract_cropped_frame(
        &self,
        input: &Path,
        output: &Path,
        timestamp: f64,
        crop: &CropBox,
    ) -> Result<(), DomainError> {
        if !input.is_file() {
            return Err(DomainError::FsFail(format!(
                "Input file not found: {}",
                input.display()
            )));
        }
        self.run_still(cropped_frame_args(input, output, timestamp, crop), output)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CropPort for FFmpegAdapter {
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display(), crop = %crop))]
    async fn crop_video(
        &self,
        input: &Path,
        output: &Path,
        crop: &CropBox,
        progress: &dyn LogPort,
    ) -> Result<(), DomainError> {
        self.run_crop(input, output, crop, progress).await?;
        Ok(())
    }
}
