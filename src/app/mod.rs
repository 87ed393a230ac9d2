// Application layer - Use case interactors

pub mod container;
pub mod export_interactor;
pub mod open_interactor;
pub mod preview_interactor;

// Re-export interactors
pub use export_interactor::{ExportEvent, ExportHandle, ExportInteractor};
pub use open_interactor::{CapturedFrame, LoadedVideo, OpenInteractor};
pub use preview_interactor::PreviewInteractor;
