//! Crop geometry: mapping between canvas and image coordinates.
//!
//! The frame is letterboxed into the canvas: scaled to fit while keeping its
//! aspect ratio, then centered with integer offsets. All functions here are
//! pure and never touch I/O, so any front end can drive them.
//!
//! Truncation (not rounding) is used for every float-to-pixel conversion so
//! that both mapping directions agree on which pixel an edge falls in.

use serde::{Deserialize, Serialize};

use crate::domain::model::{AspectRatio, CanvasRect, CanvasSize, CropBox, ImageSize};

/// Where the scaled frame sits inside the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub width: u32,
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl DisplayRect {
    /// Canvas-to-image scale along x
    pub fn scale_to_image_x(&self, image: ImageSize) -> f64 {
        image.width as f64 / self.width as f64
    }

    /// Canvas-to-image scale along y
    pub fn scale_to_image_y(&self, image: ImageSize) -> f64 {
        image.height as f64 / self.height as f64
    }

    /// Clamp a canvas x coordinate into the displayed frame
    fn clamp_x(&self, x: i32) -> i64 {
        let lo = self.offset_x as i64;
        (x as i64).clamp(lo, lo + self.width as i64)
    }

    /// Clamp a canvas y coordinate into the displayed frame
    fn clamp_y(&self, y: i32) -> i64 {
        let lo = self.offset_y as i64;
        (y as i64).clamp(lo, lo + self.height as i64)
    }
}

/// Letterbox the image into the canvas.
///
/// The axis whose ratio dominates is filled completely; the other one is
/// derived from the image ratio and truncated. Both display sides are kept
/// at least one pixel so extreme ratios never produce an empty display.
pub fn display_rect(image: ImageSize, canvas: CanvasSize) -> DisplayRect {
    let image_ratio = image.aspect_ratio();
    let canvas_ratio = canvas.aspect_ratio();

    let (width, height) = if image_ratio > canvas_ratio {
        (canvas.width, (canvas.width as f64 / image_ratio) as u32)
    } else {
        ((canvas.height as f64 * image_ratio) as u32, canvas.height)
    };
    let width = width.clamp(1, canvas.width);
    let height = height.clamp(1, canvas.height);

    DisplayRect {
        width,
        height,
        offset_x: (canvas.width - width) / 2,
        offset_y: (canvas.height - height) / 2,
    }
}

/// Crop box covering the whole frame
pub fn full_frame_crop(image: ImageSize) -> CropBox {
    CropBox::new(0, 0, image.width, image.height)
}

/// Project an image-space crop box onto the canvas for drawing
pub fn crop_box_to_canvas(crop: &CropBox, image: ImageSize, canvas: CanvasSize) -> CanvasRect {
    let display = display_rect(image, canvas);
    let scale_x = display.width as f64 / image.width as f64;
    let scale_y = display.height as f64 / image.height as f64;

    let project = |offset: u32, edge: u64, scale: f64| offset as i32 + (edge as f64 * scale) as i32;

    CanvasRect {
        x0: project(display.offset_x, crop.x as u64, scale_x),
        y0: project(display.offset_y, crop.y as u64, scale_y),
        x1: project(display.offset_x, crop.right(), scale_x),
        y1: project(display.offset_y, crop.bottom(), scale_y),
    }
}

/// Translate a canvas drag rectangle into an image-space crop box.
///
/// Corners are ordered, clamped into the displayed frame and scaled back to
/// image pixels. A pinned ratio recomputes the width from the height. The
/// result always lies inside the image and is at least 1x1.
pub fn crop_box_from_canvas_drag(
    image: ImageSize,
    canvas: CanvasSize,
    drag: CanvasRect,
    ratio: Option<AspectRatio>,
) -> CropBox {
    let display = display_rect(image, canvas);
    let drag = drag.normalized();

    let x0 = display.clamp_x(drag.x0);
    let y0 = display.clamp_y(drag.y0);
    let x1 = display.clamp_x(drag.x1);
    let y1 = display.clamp_y(drag.y1);

    let scale_x = display.scale_to_image_x(image);
    let scale_y = display.scale_to_image_y(image);

    let x = ((x0 - display.offset_x as i64) as f64 * scale_x) as i64;
    let y = ((y0 - display.offset_y as i64) as f64 * scale_y) as i64;
    let mut width = ((x1 - x0) as f64 * scale_x) as i64;
    let height = ((y1 - y0) as f64 * scale_y) as i64;

    if let Some(ratio) = ratio {
        width = (height as f64 * ratio.value()) as i64;
    }

    let image_w = image.width as i64;
    let image_h = image.height as i64;
    // A drag ending on the far edge maps to x == image width; pull it back in.
    let x = x.clamp(0, image_w - 1);
    let y = y.clamp(0, image_h - 1);
    let width = width.min(image_w - x).max(1);
    let height = height.min(image_h - y).max(1);

    CropBox::new(x as u32, y as u32, width as u32, height as u32)
}

/// Largest centered box of the given ratio that fits inside the image
pub fn centered_crop_for_ratio(image: ImageSize, ratio: AspectRatio) -> CropBox {
    let image_w = image.width as u64;
    let image_h = image.height as u64;

    let base_height = (image_w as f64 / ratio.value()) as u64;
    let (width, height) = if base_height <= image_h {
        (image_w, base_height)
    } else {
        ((image_h as f64 * ratio.value()) as u64, image_h)
    };
    let width = width.clamp(1, image_w);
    let height = height.clamp(1, image_h);

    CropBox::new(
        ((image_w - width) / 2) as u32,
        ((image_h - height) / 2) as u32,
        width as u32,
        height as u32,
    )
}

#[cfg(test)]
mod tests;
