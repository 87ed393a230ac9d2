// Preview interactor - Renders a still of the cropped result

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor for the "preview crop" action
pub struct PreviewInteractor {
    probe_port: Arc<dyn ProbePort>,
    frame_port: Arc<dyn FramePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    preview_timestamp: f64,
}

impl PreviewInteractor {
    /// Create new preview interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        frame_port: Arc<dyn FramePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        preview_timestamp: f64,
    ) -> Self {
        Self {
            probe_port,
            frame_port,
            fs_port,
            log_port,
            preview_timestamp,
        }
    }

    /// Write a cropped still of `input` and return its path.
    ///
    /// Without `output` the still goes to the preview directory.
    pub async fn preview(
        &self,
        input: &Path,
        crop: &CropBox,
        output: Option<&Path>,
    ) -> Result<PathBuf, DomainError> {
        let metadata = self.probe_port.probe(input).await?;
        crop.validate(metadata.frame_size()?)?;

        let output = match output {
            Some(path) => path.to_path_buf(),
            None => self.fs_port.preview_dir().join("preview_cropped.png"),
        };
        self.fs_port.ensure_parent_dir(&output).await?;

        let timestamp = preview_time(self.preview_timestamp, metadata.duration);
        debug!(timestamp, %crop, "Rendering crop preview");
        self.frame_port
            .extract_cropped_frame(input, &output, timestamp, crop)
            .await?;

        self.log_port
            .info(&format!("Preview saved to {}", output.display()));
        Ok(output)
    }
}

/// Preview timestamp, pulled back into clips shorter than the preferred one
pub fn preview_time(preferred: f64, duration: f64) -> f64 {
    if duration > 0.0 && preferred >= duration {
        duration / 2.0
    } else {
        preferred.max(0.0)
    }
}
