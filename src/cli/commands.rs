//! Command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info};

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::ExportEvent;
use crate::cli::args::{CropArgs, FrameArgs, InspectArgs, PlanArgs, PreviewArgs};
use crate::domain::geometry::DisplayRect;
use crate::domain::model::*;
use crate::domain::session::{CropSession, Overlay};
use crate::ports::AppConfig;
use crate::utils::format_file_size;

/// Result of `plan`, also its JSON shape
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub image: ImageSize,
    pub canvas: CanvasSize,
    pub display: DisplayRect,
    pub crop: CropBox,
    pub filter: String,
    pub overlay: Overlay,
}

impl PlanReport {
    pub fn from_session(session: &CropSession) -> Option<Self> {
        let crop = session.crop_box()?;
        Some(Self {
            image: session.image()?,
            canvas: session.canvas(),
            display: session.display()?,
            crop,
            filter: crop.as_filter(),
            overlay: session.overlay()?,
        })
    }

    /// Human-readable rendering
    pub fn render(&self) -> String {
        let rect = &self.overlay.rect;
        format!(
            "Image:   {}\n\
             Canvas:  {} (frame shown at {}x{}+{}+{})\n\
             Crop:    x={} y={} w={} h={}\n\
             Filter:  {}\n\
             Overlay: ({},{})-({},{}) {}",
            self.image,
            self.canvas,
            self.display.width,
            self.display.height,
            self.display.offset_x,
            self.display.offset_y,
            self.crop.x,
            self.crop.y,
            self.crop.width,
            self.crop.height,
            self.filter,
            rect.x0,
            rect.y0,
            rect.x1,
            rect.y1,
            self.overlay.label,
        )
    }
}

/// Execute the inspect command
pub async fn inspect(container: &DefaultAppContainer, args: InspectArgs) -> Result<()> {
    info!("Input: {}", args.input.display());

    let metadata = container
        .open_interactor()
        .inspect(&args.input)
        .await
        .context("Failed to inspect input file")?;

    if args.json {
        let json = serde_json::to_string_pretty(&metadata)
            .context("Failed to serialize video metadata to JSON")?;
        println!("{}", json);
    } else {
        println!("{}", metadata.describe());
        if let Some(format) = &metadata.format_name {
            println!("Container: {}", format);
        }
        if let Some(codec) = &metadata.codec {
            println!("Codec: {}", codec);
        }
        if let Ok(size) = std::fs::metadata(&metadata.path).map(|m| m.len()) {
            println!("File size: {}", format_file_size(size));
        }
    }
    Ok(())
}

/// Execute the frame command
pub async fn frame(container: &DefaultAppContainer, args: FrameArgs) -> Result<()> {
    let at = TimeSpec::parse(&args.at)
        .map_err(|e| anyhow::anyhow!("Invalid timestamp '{}': {}", args.at, e))?;
    info!("Extracting frame at {} from {}", at, args.input.display());

    let frame = container
        .open_interactor()
        .capture(&args.input, args.output, at.as_seconds())
        .await
        .context("Failed to extract frame")?;

    println!("Saved {} frame to {}", frame.size, frame.path.display());
    Ok(())
}

/// Execute the plan command
pub fn plan(config: &AppConfig, args: PlanArgs) -> Result<()> {
    let image = ImageSize::new(args.width, args.height)?;
    let session = args.spec.apply(image, config.canvas()?)?;
    let report = PlanReport::from_session(&session)
        .ok_or_else(|| anyhow::anyhow!("No crop box could be determined"))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.render());
    }
    Ok(())
}

/// Execute the preview command
pub async fn preview(container: &DefaultAppContainer, config: &AppConfig, args: PreviewArgs) -> Result<()> {
    let metadata = container
        .open_interactor()
        .inspect(&args.input)
        .await
        .context("Failed to inspect input file")?;
    let crop = args.spec.resolve(metadata.frame_size()?, config.canvas()?)?;
    info!("Previewing crop {} of {}", crop, metadata.file_name());

    let path = container
        .preview_interactor()
        .preview(&args.input, &crop, Some(args.output.as_path()))
        .await
        .context("Failed to render preview")?;

    println!("{}", path.display());
    Ok(())
}

/// Execute the crop command
pub async fn crop(container: &DefaultAppContainer, config: &AppConfig, args: CropArgs) -> Result<()> {
    let metadata = container
        .open_interactor()
        .inspect(&args.input)
        .await
        .context("Failed to inspect input file")?;
    let crop = args.spec.resolve(metadata.frame_size()?, config.canvas()?)?;
    info!("Cropping {} to {}", metadata.file_name(), crop);

    let exporter = container.export_interactor();
    let handle = match args.output {
        Some(output) => exporter.save_as(args.input.clone(), output, crop),
        None => exporter.save_over(args.input.clone(), crop),
    };

    match handle.wait(|line| println!("{}", line)).await {
        ExportEvent::Finished(path) => {
            println!("Saved cropped video to {}", path.display());
            Ok(())
        }
        ExportEvent::Failed(message) => {
            error!("{}", message);
            Err(anyhow::anyhow!(message))
        }
        ExportEvent::Progress(line) => Err(anyhow::anyhow!("Export ended unexpectedly: {}", line)),
    }
}

/// Execute the presets command
pub fn presets() {
    for preset in AspectPreset::ALL {
        let ratio = preset
            .ratio()
            .map(|r| format!("{:.4}", r.value()))
            .unwrap_or_else(|| "free".to_string());
        println!("{:<16} {:<20} {}", preset.slug(), preset.name(), ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_report_render() {
        let mut session = CropSession::default();
        session.load_frame(ImageSize::new(1920, 1080).unwrap(), true);
        session.press(100, 50);
        session.drag(400, 300);
        session.release();

        let report = PlanReport::from_session(&session).unwrap();
        assert_eq!(report.filter, "crop=640:533:213:91");
        let text = report.render();
        assert!(text.contains("Crop:    x=213 y=91 w=640 h=533"));
        assert!(text.contains("frame shown at 900x506+0+7"));
        assert!(text.ends_with("640x533"));
    }

    #[test]
    fn test_plan_report_needs_frame() {
        assert!(PlanReport::from_session(&CropSession::default()).is_none());
    }
}
