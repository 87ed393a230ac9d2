use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, FsLocalAdapter, TracingLogAdapter};
use crate::app::{
    export_interactor::ExportInteractor, open_interactor::OpenInteractor,
    preview_interactor::PreviewInteractor,
};
use crate::domain::errors::DomainError;
use crate::ports::{AppConfig, CropPort, FramePort, FsPort, LogPort, ProbePort, SnapshotPort};

pub trait AppContainer: Send + Sync {
    fn open_interactor(&self) -> Arc<OpenInteractor>;
    fn preview_interactor(&self) -> Arc<PreviewInteractor>;
    fn export_interactor(&self) -> Arc<ExportInteractor>;
}

pub struct DefaultAppContainer {
    open_interactor: Arc<OpenInteractor>,
    preview_interactor: Arc<PreviewInteractor>,
    export_interactor: Arc<ExportInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let probe_port = Arc::new(FFprobeAdapter::new(config.ffprobe_path.clone())?);
        let ffmpeg = Arc::new(FFmpegAdapter::new(config.ffmpeg_path.clone())?);
        let fs_port = Arc::new(FsLocalAdapter::new()?);
        let log_port = Arc::new(TracingLogAdapter::new(config.log_level));

        Ok(Self::with_ports(
            probe_port,
            Arc::clone(&ffmpeg) as Arc<dyn FramePort>,
            ffmpeg,
            None,
            fs_port,
            log_port,
            config.preview_timestamp,
        ))
    }

    /// Wire interactors over arbitrary port implementations
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        frame_port: Arc<dyn FramePort>,
        crop_port: Arc<dyn CropPort>,
        snapshot_port: Option<Arc<dyn SnapshotPort>>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        preview_timestamp: f64,
    ) -> Self {
        let open_interactor = Arc::new(OpenInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&frame_port),
            snapshot_port,
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        let preview_interactor = Arc::new(PreviewInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&frame_port),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
            preview_timestamp,
        ));

        let export_interactor = Arc::new(ExportInteractor::new(
            crop_port,
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        Self {
            open_interactor,
            preview_interactor,
            export_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn open_interactor(&self) -> Arc<OpenInteractor> {
        Arc::clone(&self.open_interactor)
    }

    fn preview_interactor(&self) -> Arc<PreviewInteractor> {
        Arc::clone(&self.preview_interactor)
    }

    fn export_interactor(&self) -> Arc<ExportInteractor> {
        Arc::clone(&self.export_interactor)
    }
}
