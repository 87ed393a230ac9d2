//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::domain::session::CropSession;

/// How the crop box is chosen
#[derive(Args, Debug, Clone, Default)]
pub struct BoxSpecArgs {
    /// Crop box in frame pixels
    #[arg(long = "box", value_name = "X,Y,W,H", conflicts_with_all = ["preset", "ratio", "drag"])]
    pub crop_box: Option<CropBox>,

    /// Aspect ratio preset (freeform, cinemascope, youtube, instagram-reel, tiktok, square)
    #[arg(long, conflicts_with = "ratio")]
    pub preset: Option<AspectPreset>,

    /// Custom aspect ratio, e.g. 4:3 or 1.85
    #[arg(long)]
    pub ratio: Option<AspectRatio>,

    /// Drag gesture on the editor canvas, start and end corner
    #[arg(long, value_name = "X0,Y0,X1,Y1", allow_hyphen_values = true)]
    pub drag: Option<CanvasRect>,

    /// Editor canvas size the drag refers to (defaults to the configured canvas)
    #[arg(long, value_name = "WxH")]
    pub canvas: Option<CanvasSize>,
}

impl BoxSpecArgs {
    /// Replay the choice on a fresh editor session for `image`.
    ///
    /// A ratio snaps the box to the centered ratio box; a drag after it is
    /// pinned to that ratio. With nothing chosen the box is the full frame.
    pub fn apply(&self, image: ImageSize, default_canvas: CanvasSize) -> Result<CropSession, DomainError> {
        let mut session = CropSession::new(self.canvas.unwrap_or(default_canvas));
        session.load_frame(image, true);

        if let Some(crop) = self.crop_box {
            session.set_crop_box(crop)?;
        }
        if let Some(preset) = self.preset {
            session.select_preset(preset);
        }
        if let Some(ratio) = self.ratio {
            session.select_ratio(ratio);
        }
        if let Some(drag) = self.drag {
            session.press(drag.x0, drag.y0);
            session.drag(drag.x1, drag.y1);
            session.release();
        }
        Ok(session)
    }

    /// The crop box this choice yields for `image`
    pub fn resolve(&self, image: ImageSize, default_canvas: CanvasSize) -> Result<CropBox, DomainError> {
        let session = self.apply(image, default_canvas)?;
        session
            .crop_box()
            .ok_or_else(|| DomainError::BadArgs("No crop box could be determined".to_string()))
    }
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the frame command
#[derive(Args, Debug)]
pub struct FrameArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Timestamp (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(long, default_value = "0")]
    pub at: String,

    /// Output image path (PNG)
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Frame width in pixels
    #[arg(long)]
    pub width: u32,

    /// Frame height in pixels
    #[arg(long)]
    pub height: u32,

    #[command(flatten)]
    pub spec: BoxSpecArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub spec: BoxSpecArgs,

    /// Output image path
    #[arg(short, long, default_value = "preview_cropped.png")]
    pub output: PathBuf,
}

/// Arguments for the crop command
#[derive(Args, Debug)]
pub struct CropArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output video file path
    #[arg(short, long, required_unless_present = "in_place", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Replace the input file with the cropped video
    #[arg(long)]
    pub in_place: bool,

    #[command(flatten)]
    pub spec: BoxSpecArgs,
}
