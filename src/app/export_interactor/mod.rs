// Export interactor - Runs crop exports on background workers
//
// Each export gets its own tokio task. Progress and the outcome come back as
// `ExportEvent`s on a channel the foreground loop drains.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{error, info, trace, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::utils::format_file_size;

/// Message shown when ffmpeg itself fails; details are in the progress log
pub const CROP_FAILED_MESSAGE: &str = "Cropping failed. See logs for details.";

/// Notification from an export worker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExportEvent {
    /// Human-readable progress line
    Progress(String),
    /// Export succeeded; carries the final output path
    Finished(PathBuf),
    /// Export failed; any partial output has been removed
    Failed(String),
}

/// Foreground side of a running export
pub struct ExportHandle {
    events: UnboundedReceiver<ExportEvent>,
    task: JoinHandle<()>,
}

impl ExportHandle {
    /// Next event, or `None` once the worker is done
    pub async fn recv(&mut self) -> Option<ExportEvent> {
        self.events.recv().await
    }

    /// Drain all events and return the terminal one
    pub async fn wait(mut self, mut on_progress: impl FnMut(&str)) -> ExportEvent {
        let mut outcome = None;
        while let Some(event) = self.events.recv().await {
            match event {
                ExportEvent::Progress(line) => on_progress(&line),
                terminal => outcome = Some(terminal),
            }
        }
        if let Err(e) = (&mut self.task).await {
            error!(error = %e, "Export worker panicked");
        }
        outcome.unwrap_or_else(|| ExportEvent::Failed("Export worker stopped unexpectedly".to_string()))
    }
}

#[derive(Debug, Clone)]
enum ExportTarget {
    SaveAs(PathBuf),
    SaveOver,
}

/// Forwards progress lines from the cropper onto the event channel
struct ChannelLog {
    tx: UnboundedSender<ExportEvent>,
}

impl LogPort for ChannelLog {
    fn log(&self, level: LogLevel, message: &str) {
        trace!(?level, "{}", message);
        // The foreground may have stopped listening; the export still runs to completion
        let _ = self.tx.send(ExportEvent::Progress(message.to_string()));
    }
}

/// Interactor for the "save as" and "save over" actions
pub struct ExportInteractor {
    crop_port: Arc<dyn CropPort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl ExportInteractor {
    /// Create new export interactor with injected ports
    pub fn new(
        crop_port: Arc<dyn CropPort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            crop_port,
            fs_port,
            log_port,
        }
    }

    /// Crop `input` into a new file at `output`
    pub fn save_as(&self, input: PathBuf, output: PathBuf, crop: CropBox) -> ExportHandle {
        self.spawn(input, ExportTarget::SaveAs(output), crop)
    }

    /// Crop `input` and replace it with the result
    pub fn save_over(&self, input: PathBuf, crop: CropBox) -> ExportHandle {
        self.spawn(input, ExportTarget::SaveOver, crop)
    }

    fn spawn(&self, input: PathBuf, target: ExportTarget, crop: CropBox) -> ExportHandle {
        let (tx, events) = mpsc::unbounded_channel();
        let worker = ExportWorker {
            crop_port: Arc::clone(&self.crop_port),
            fs_port: Arc::clone(&self.fs_port),
            log_port: Arc::clone(&self.log_port),
            tx,
        };
        let task = tokio::spawn(async move { worker.run(input, target, crop).await });
        ExportHandle { events, task }
    }
}

struct ExportWorker {
    crop_port: Arc<dyn CropPort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    tx: UnboundedSender<ExportEvent>,
}

impl ExportWorker {
    async fn run(self, input: PathBuf, target: ExportTarget, crop: CropBox) {
        let progress = ChannelLog {
            tx: self.tx.clone(),
        };
        let result = match &target {
            ExportTarget::SaveAs(output) => self.save_as(&input, output, &crop, &progress).await,
            ExportTarget::SaveOver => self.save_over(&input, &crop, &progress).await,
        };

        let event = match result {
            Ok(path) => {
                let size = self
                    .fs_port
                    .file_size(&path)
                    .await
                    .map(format_file_size)
                    .unwrap_or_else(|_| "unknown size".to_string());
                self.log_port
                    .info(&format!("Saved cropped video to {} ({})", path.display(), size));
                ExportEvent::Finished(path)
            }
            Err(e) => {
                self.log_port.error(&e.to_string());
                let message = match e {
                    DomainError::CropFail(_) => CROP_FAILED_MESSAGE.to_string(),
                    other => other.to_string(),
                };
                ExportEvent::Failed(message)
            }
        };
        let _ = self.tx.send(event);
    }

    async fn save_as(
        &self,
        input: &Path,
        output: &Path,
        crop: &CropBox,
        progress: &ChannelLog,
    ) -> Result<PathBuf, DomainError> {
        if same_file(input, output) {
            return Err(DomainError::BadArgs(
                "Output path is the input file; save over it instead".to_string(),
            ));
        }
        self.fs_port.ensure_parent_dir(output).await?;

        info!(input = %input.display(), output = %output.display(), %crop, "Starting export");
        progress.info(&format!("Cropping to {}", output.display()));
        if let Err(e) = self
            .crop_port
            .crop_video(input, output, crop, progress)
            .await
        {
            self.discard(output).await;
            return Err(e);
        }
        Ok(output.to_path_buf())
    }

    async fn save_over(
        &self,
        input: &Path,
        crop: &CropBox,
        progress: &ChannelLog,
    ) -> Result<PathBuf, DomainError> {
        let temp = self.fs_port.create_sibling_temp(input).await?;

        info!(input = %input.display(), temp = %temp.display(), %crop, "Starting in-place export");
        progress.info(&format!("Cropping {} in place", input.display()));
        if let Err(e) = self.crop_port.crop_video(input, &temp, crop, progress).await {
            self.discard(&temp).await;
            return Err(e);
        }

        if let Err(e) = self.fs_port.replace_file(&temp, input).await {
            self.discard(&temp).await;
            return Err(match e {
                DomainError::ReplaceFail(_) => e,
                other => DomainError::ReplaceFail(other.to_string()),
            });
        }
        Ok(input.to_path_buf())
    }

    async fn discard(&self, path: &Path) {
        if let Err(e) = self.fs_port.remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Could not remove partial output");
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
