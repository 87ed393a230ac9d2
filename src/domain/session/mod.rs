// Editor session - Toolkit-agnostic state of the crop view

use serde::Serialize;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::geometry::{self, DisplayRect};
use crate::domain::model::{AspectPreset, AspectRatio, CanvasRect, CanvasSize, CropBox, ImageSize};

/// What a front end needs to draw the crop rectangle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    /// Crop rectangle in canvas coordinates
    pub rect: CanvasRect,
    /// Frame placement inside the canvas
    pub display: DisplayRect,
    /// Size caption, e.g. `1920x1080`
    pub label: String,
}

/// State of one crop editor: loaded frame, viewport, crop box and drag.
///
/// Pointer events arrive in canvas coordinates and are mapped to image
/// space immediately, so the stored crop box always satisfies the crop
/// invariant for the loaded frame.
#[derive(Debug, Clone)]
pub struct CropSession {
    image: Option<ImageSize>,
    canvas: CanvasSize,
    crop: Option<CropBox>,
    drag_start: Option<(i32, i32)>,
    preset: AspectPreset,
    custom_ratio: Option<AspectRatio>,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::new(CanvasSize::DEFAULT)
    }
}

impl CropSession {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            image: None,
            canvas,
            crop: None,
            drag_start: None,
            preset: AspectPreset::Freeform,
            custom_ratio: None,
        }
    }

    pub fn image(&self) -> Option<ImageSize> {
        self.image
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn crop_box(&self) -> Option<CropBox> {
        self.crop
    }

    pub fn preset(&self) -> AspectPreset {
        self.preset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Ratio applied to drags: a custom ratio wins over the preset
    pub fn pinned_ratio(&self) -> Option<AspectRatio> {
        self.custom_ratio.or_else(|| self.preset.ratio())
    }

    /// Install a freshly decoded frame.
    ///
    /// The box resets to the full frame when asked, when there is none yet,
    /// or when the previous box does not fit the new frame.
    pub fn load_frame(&mut self, image: ImageSize, reset_crop: bool) -> CropBox {
        self.image = Some(image);
        self.drag_start = None;
        let crop = match self.crop {
            Some(crop) if !reset_crop && crop.fits(image) => crop,
            _ => geometry::full_frame_crop(image),
        };
        debug!(%image, %crop, "Frame loaded");
        self.crop = Some(crop);
        crop
    }

    /// Start a drag; ignored until a frame is loaded
    pub fn press(&mut self, x: i32, y: i32) -> bool {
        if self.image.is_none() {
            return false;
        }
        self.drag_start = Some((x, y));
        true
    }

    /// Update the crop box from the active drag
    pub fn drag(&mut self, x: i32, y: i32) -> Option<CropBox> {
        let (start_x, start_y) = self.drag_start?;
        let image = self.image?;
        let crop = geometry::crop_box_from_canvas_drag(
            image,
            self.canvas,
            CanvasRect::new(start_x, start_y, x, y),
            self.pinned_ratio(),
        );
        self.crop = Some(crop);
        Some(crop)
    }

    pub fn release(&mut self) {
        self.drag_start = None;
    }

    /// Choose a preset; ratio presets snap the box to the centered ratio box
    pub fn select_preset(&mut self, preset: AspectPreset) -> Option<CropBox> {
        self.preset = preset;
        self.custom_ratio = None;
        let ratio = preset.ratio()?;
        self.apply_ratio(ratio)
    }

    /// Pin an arbitrary ratio and snap the box to it
    pub fn select_ratio(&mut self, ratio: AspectRatio) -> Option<CropBox> {
        self.custom_ratio = Some(ratio);
        self.apply_ratio(ratio)
    }

    fn apply_ratio(&mut self, ratio: AspectRatio) -> Option<CropBox> {
        let image = self.image?;
        let crop = geometry::centered_crop_for_ratio(image, ratio);
        self.crop = Some(crop);
        Some(crop)
    }

    /// Manual coordinate entry
    pub fn set_crop_box(&mut self, crop: CropBox) -> Result<(), DomainError> {
        let image = self
            .image
            .ok_or_else(|| DomainError::BadArgs("No frame loaded".to_string()))?;
        crop.validate(image)?;
        self.crop = Some(crop);
        Ok(())
    }

    pub fn resize_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Frame placement for the current canvas
    pub fn display(&self) -> Option<DisplayRect> {
        self.image
            .map(|image| geometry::display_rect(image, self.canvas))
    }

    /// Rectangle and caption to draw for the current box
    pub fn overlay(&self) -> Option<Overlay> {
        let image = self.image?;
        let crop = self.crop?;
        Some(Overlay {
            rect: geometry::crop_box_to_canvas(&crop, image, self.canvas),
            display: geometry::display_rect(image, self.canvas),
            label: format!("{}x{}", crop.width, crop.height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd() -> ImageSize {
        ImageSize::new(1920, 1080).unwrap()
    }

    #[test]
    fn test_events_ignored_without_frame() {
        let mut session = CropSession::default();
        assert!(!session.press(10, 10));
        assert!(session.drag(100, 100).is_none());
        assert!(session.select_preset(AspectPreset::Square).is_none());
        assert_eq!(session.preset(), AspectPreset::Square);
        assert!(session.overlay().is_none());
        assert!(session.set_crop_box(CropBox::new(0, 0, 1, 1)).is_err());
    }

    #[test]
    fn test_load_frame_defaults_to_full_frame() {
        let mut session = CropSession::default();
        let crop = session.load_frame(hd(), false);
        assert_eq!(crop, CropBox::new(0, 0, 1920, 1080));
        assert_eq!(session.crop_box(), Some(crop));
    }

    #[test]
    fn test_load_frame_keeps_box_unless_reset() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);
        session.set_crop_box(CropBox::new(10, 10, 100, 100)).unwrap();

        session.load_frame(hd(), false);
        assert_eq!(session.crop_box(), Some(CropBox::new(10, 10, 100, 100)));

        session.load_frame(hd(), true);
        assert_eq!(session.crop_box(), Some(CropBox::new(0, 0, 1920, 1080)));
    }

    #[test]
    fn test_load_smaller_frame_resets_box_that_no_longer_fits() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);
        session.load_frame(ImageSize::new(640, 360).unwrap(), false);
        assert_eq!(session.crop_box(), Some(CropBox::new(0, 0, 640, 360)));
    }

    #[test]
    fn test_drag_updates_box_until_release() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);

        assert!(session.press(100, 50));
        assert!(session.is_dragging());
        assert_eq!(session.drag(400, 300), Some(CropBox::new(213, 91, 640, 533)));

        session.release();
        assert!(!session.is_dragging());
        assert!(session.drag(800, 500).is_none());
        assert_eq!(session.crop_box(), Some(CropBox::new(213, 91, 640, 533)));
    }

    #[test]
    fn test_preset_pins_drag_ratio() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);
        assert_eq!(
            session.select_preset(AspectPreset::YouTube),
            Some(CropBox::new(0, 0, 1920, 1080))
        );

        session.press(100, 50);
        assert_eq!(session.drag(400, 300), Some(CropBox::new(213, 91, 947, 533)));
    }

    #[test]
    fn test_freeform_keeps_current_box() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);
        session.select_preset(AspectPreset::Square);
        assert!(session.select_preset(AspectPreset::Freeform).is_none());
        assert_eq!(session.crop_box(), Some(CropBox::new(420, 0, 1080, 1080)));
        assert!(session.pinned_ratio().is_none());
    }

    #[test]
    fn test_custom_ratio_overrides_preset_until_next_preset() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);
        let ratio = AspectRatio::new(4.0 / 3.0).unwrap();
        assert_eq!(session.select_ratio(ratio), Some(CropBox::new(240, 0, 1440, 1080)));
        assert_eq!(session.pinned_ratio(), Some(ratio));

        session.select_preset(AspectPreset::Square);
        assert_eq!(session.pinned_ratio(), AspectPreset::Square.ratio());
    }

    #[test]
    fn test_manual_entry_validated() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);
        assert!(session.set_crop_box(CropBox::new(1900, 0, 100, 100)).is_err());
        assert_eq!(session.crop_box(), Some(CropBox::new(0, 0, 1920, 1080)));
    }

    #[test]
    fn test_overlay_follows_canvas_resize() {
        let mut session = CropSession::default();
        session.load_frame(hd(), true);

        let overlay = session.overlay().unwrap();
        assert_eq!(overlay.rect, CanvasRect::new(0, 7, 900, 513));
        assert_eq!(overlay.label, "1920x1080");

        session.resize_canvas(CanvasSize::new(1920, 1080).unwrap());
        let overlay = session.overlay().unwrap();
        assert_eq!(overlay.rect, CanvasRect::new(0, 0, 1920, 1080));
        assert_eq!(session.crop_box(), Some(CropBox::new(0, 0, 1920, 1080)));
    }
}
