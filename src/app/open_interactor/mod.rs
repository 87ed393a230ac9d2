// Open interactor - Probes a video and captures the frame the editor shows

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// A video ready for editing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedVideo {
    pub metadata: VideoMetadata,
    /// Still of the first frame, inside the preview directory
    pub frame_path: PathBuf,
    /// Pixel size of the still; crop boxes live in this space
    pub frame_size: ImageSize,
}

/// A still captured at some timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedFrame {
    pub path: PathBuf,
    pub size: ImageSize,
}

/// Interactor for opening videos and seeking to frames
pub struct OpenInteractor {
    probe_port: Arc<dyn ProbePort>,
    frame_port: Arc<dyn FramePort>,
    snapshot_port: Option<Arc<dyn SnapshotPort>>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl OpenInteractor {
    /// Create new open interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        frame_port: Arc<dyn FramePort>,
        snapshot_port: Option<Arc<dyn SnapshotPort>>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe_port,
            frame_port,
            snapshot_port,
            fs_port,
            log_port,
        }
    }

    /// Probe `path` without decoding any frame
    pub async fn inspect(&self, path: &Path) -> Result<VideoMetadata, DomainError> {
        if !self.fs_port.file_exists(path).await? {
            return Err(DomainError::FsFail(format!(
                "Input file does not exist: {}",
                path.display()
            )));
        }
        self.probe_port.probe(path).await
    }

    /// Probe `path` and capture its first frame
    pub async fn open(&self, path: &Path) -> Result<LoadedVideo, DomainError> {
        let metadata = self.inspect(path).await?;
        let frame = self
            .capture(path, self.fs_port.preview_dir().join("frame.png"), 0.0)
            .await?;

        let probed = metadata.frame_size()?;
        if frame.size != probed {
            // Anamorphic sources decode to a different still size; the still wins
            warn!(
                %probed,
                decoded = %frame.size,
                "Frame size differs from probed stream size"
            );
        }

        self.log_port.info(&metadata.describe());
        Ok(LoadedVideo {
            metadata,
            frame_path: frame.path,
            frame_size: frame.size,
        })
    }

    /// Capture the frame at `seconds`
    pub async fn frame_at(&self, path: &Path, seconds: f64) -> Result<CapturedFrame, DomainError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(DomainError::BadArgs(format!(
                "Timestamp must be a non-negative number of seconds, got {}",
                seconds
            )));
        }
        let name = format!("frame_{}ms.png", (seconds * 1000.0).round() as u64);
        self.capture(path, self.fs_port.preview_dir().join(name), seconds)
            .await
    }

    /// Capture a still to `output`, preferring the player snapshot
    pub async fn capture(
        &self,
        input: &Path,
        output: PathBuf,
        seconds: f64,
    ) -> Result<CapturedFrame, DomainError> {
        self.fs_port.ensure_parent_dir(&output).await?;

        let snapped = match &self.snapshot_port {
            Some(snapshot) => match snapshot.snapshot(&output, Some(seconds)).await {
                Ok(taken) => taken,
                Err(e) => {
                    warn!(error = %e, "Snapshot failed, extracting frame instead");
                    false
                }
            },
            None => false,
        };

        if !snapped {
            debug!(seconds, "Extracting frame with ffmpeg");
            self.frame_port.extract_frame(input, &output, seconds).await?;
        }

        let size = read_image_size(&output)?;
        Ok(CapturedFrame { path: output, size })
    }
}

/// Pixel dimensions of a still on disk
pub fn read_image_size(path: &Path) -> Result<ImageSize, DomainError> {
    let (width, height) = image::image_dimensions(path).map_err(|e| {
        DomainError::ExtractFail(format!("Cannot read frame {}: {}", path.display(), e))
    })?;
    ImageSize::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_image_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("still.png");
        image::RgbImage::new(64, 36).save(&path).unwrap();
        assert_eq!(read_image_size(&path).unwrap(), ImageSize::new(64, 36).unwrap());
    }

    #[test]
    fn test_read_image_size_rejects_non_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("still.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(matches!(
            read_image_size(&path),
            Err(DomainError::ExtractFail(_))
        ));
    }
}
