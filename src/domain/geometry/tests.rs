// Unit and property tests for crop geometry

use super::*;
use crate::domain::model::AspectPreset;

fn image(w: u32, h: u32) -> ImageSize {
    ImageSize::new(w, h).unwrap()
}

fn canvas(w: u32, h: u32) -> CanvasSize {
    CanvasSize::new(w, h).unwrap()
}

fn ratio(value: f64) -> AspectRatio {
    AspectRatio::new(value).unwrap()
}

#[test]
fn test_display_rect_wide_image_fills_width() {
    let rect = display_rect(image(1920, 1080), canvas(900, 520));
    assert_eq!(
        rect,
        DisplayRect {
            width: 900,
            height: 506,
            offset_x: 0,
            offset_y: 7,
        }
    );
}

#[test]
fn test_display_rect_tall_image_fills_height() {
    let rect = display_rect(image(1080, 1920), canvas(900, 520));
    assert_eq!(rect.height, 520);
    assert_eq!(rect.width, 292);
    assert_eq!(rect.offset_x, 304);
    assert_eq!(rect.offset_y, 0);
}

#[test]
fn test_display_rect_same_ratio_fills_canvas() {
    let rect = display_rect(image(1800, 1040), canvas(900, 520));
    assert_eq!((rect.width, rect.height), (900, 520));
    assert_eq!((rect.offset_x, rect.offset_y), (0, 0));
}

#[test]
fn test_display_rect_extreme_ratio_never_empty() {
    let rect = display_rect(image(10_000, 1), canvas(900, 520));
    assert_eq!(rect.width, 900);
    assert_eq!(rect.height, 1);
}

#[test]
fn test_full_frame_crop() {
    assert_eq!(full_frame_crop(image(640, 360)), CropBox::new(0, 0, 640, 360));
}

#[test]
fn test_drag_example_freeform() {
    let crop = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(100, 50, 400, 300),
        None,
    );
    assert_eq!(crop, CropBox::new(213, 91, 640, 533));
}

#[test]
fn test_drag_example_pinned_ratio() {
    let crop = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(100, 50, 400, 300),
        AspectPreset::YouTube.ratio(),
    );
    assert_eq!(crop, CropBox::new(213, 91, 947, 533));
}

#[test]
fn test_drag_corners_in_any_order() {
    let forward = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(100, 50, 400, 300),
        None,
    );
    let backward = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(400, 300, 100, 50),
        None,
    );
    assert_eq!(forward, backward);
}

#[test]
fn test_drag_outside_canvas_clamps_to_frame() {
    let crop = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(-50, -50, 2000, 2000),
        None,
    );
    assert_eq!(crop.x, 0);
    assert_eq!(crop.y, 0);
    assert!(crop.width >= 1919 && crop.width <= 1920);
    assert!(crop.height >= 1079 && crop.height <= 1080);
    assert!(crop.fits(image(1920, 1080)));
}

#[test]
fn test_zero_size_drag_yields_one_pixel_box() {
    let crop = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(450, 260, 450, 260),
        None,
    );
    assert_eq!((crop.width, crop.height), (1, 1));
    assert!(crop.fits(image(1920, 1080)));
}

#[test]
fn test_drag_on_far_edge_stays_inside() {
    let crop = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(900, 513, 950, 600),
        None,
    );
    assert!(crop.fits(image(1920, 1080)), "{crop} escapes the frame");
    assert_eq!((crop.width, crop.height), (1, 1));
}

#[test]
fn test_pinned_ratio_clamped_by_right_edge() {
    // Tall drag near the right edge: width from ratio would overflow.
    let crop = crop_box_from_canvas_drag(
        image(1920, 1080),
        canvas(900, 520),
        CanvasRect::new(800, 7, 850, 513),
        Some(ratio(16.0 / 9.0)),
    );
    assert_eq!(crop.right(), 1920);
    assert!(crop.fits(image(1920, 1080)));
}

#[test]
fn test_crop_box_to_canvas_full_frame() {
    let rect = crop_box_to_canvas(
        &CropBox::new(0, 0, 1920, 1080),
        image(1920, 1080),
        canvas(900, 520),
    );
    assert_eq!(rect, CanvasRect::new(0, 7, 900, 513));
}

#[test]
fn test_crop_box_to_canvas_pillarboxed() {
    let rect = crop_box_to_canvas(
        &CropBox::new(0, 0, 1080, 1920),
        image(1080, 1920),
        canvas(900, 520),
    );
    assert_eq!(rect, CanvasRect::new(304, 0, 596, 520));
}

#[test]
fn test_centered_ratio_youtube_on_hd_is_full_frame() {
    let crop = centered_crop_for_ratio(image(1920, 1080), AspectPreset::YouTube.ratio().unwrap());
    assert_eq!(crop, CropBox::new(0, 0, 1920, 1080));
}

#[test]
fn test_centered_ratio_vertical_on_hd() {
    let crop = centered_crop_for_ratio(image(1920, 1080), AspectPreset::TikTok.ratio().unwrap());
    assert_eq!(crop, CropBox::new(656, 0, 607, 1080));
}

#[test]
fn test_centered_ratio_cinemascope_on_hd() {
    let crop = centered_crop_for_ratio(image(1920, 1080), AspectPreset::CinemaScope.ratio().unwrap());
    assert_eq!(crop, CropBox::new(0, 138, 1920, 803));
}

#[test]
fn test_centered_ratio_square() {
    let crop = centered_crop_for_ratio(image(1920, 1080), AspectPreset::Square.ratio().unwrap());
    assert_eq!(crop, CropBox::new(420, 0, 1080, 1080));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image_strategy() -> impl Strategy<Value = ImageSize> {
        (16u32..=4000, 16u32..=4000).prop_map(|(w, h)| image(w, h))
    }

    fn canvas_strategy() -> impl Strategy<Value = CanvasSize> {
        (50u32..=2000, 50u32..=2000).prop_map(|(w, h)| canvas(w, h))
    }

    /// Image together with a box that satisfies the crop invariant
    fn image_and_box() -> impl Strategy<Value = (ImageSize, CropBox)> {
        image_strategy().prop_flat_map(|img| {
            (0..img.width, 0..img.height).prop_flat_map(move |(x, y)| {
                (1..=img.width - x, 1..=img.height - y)
                    .prop_map(move |(w, h)| (img, CropBox::new(x, y, w, h)))
            })
        })
    }

    fn ratio_strategy() -> impl Strategy<Value = AspectRatio> {
        (0.2f64..5.0).prop_map(ratio)
    }

    proptest! {
        /// Property: the display rectangle always fits in the canvas.
        #[test]
        fn prop_display_rect_fits_canvas(img in image_strategy(), cv in canvas_strategy()) {
            let rect = display_rect(img, cv);
            prop_assert!(rect.width >= 1 && rect.height >= 1);
            prop_assert!(rect.offset_x + rect.width <= cv.width);
            prop_assert!(rect.offset_y + rect.height <= cv.height);
        }

        /// Property: the display rectangle keeps the image ratio up to truncation.
        #[test]
        fn prop_display_rect_preserves_ratio(img in image_strategy(), cv in canvas_strategy()) {
            let rect = display_rect(img, cv);
            if img.aspect_ratio() > cv.aspect_ratio() {
                prop_assert_eq!(rect.width, cv.width);
                let exact = cv.width as f64 / img.aspect_ratio();
                prop_assert!(rect.height as f64 <= exact.max(1.0) + 1e-6);
                prop_assert!(rect.height as f64 > exact - 1.0);
            } else {
                prop_assert_eq!(rect.height, cv.height);
                let exact = cv.height as f64 * img.aspect_ratio();
                prop_assert!(rect.width as f64 <= exact.max(1.0) + 1e-6);
                prop_assert!(rect.width as f64 > exact - 1.0);
            }
        }

        /// Property: any drag, even outside the canvas, yields a valid box.
        #[test]
        fn prop_drag_always_inside_image(
            img in image_strategy(),
            cv in canvas_strategy(),
            x0 in -500i32..2500,
            y0 in -500i32..2500,
            x1 in -500i32..2500,
            y1 in -500i32..2500,
            pinned in proptest::option::of(ratio_strategy()),
        ) {
            let crop = crop_box_from_canvas_drag(img, cv, CanvasRect::new(x0, y0, x1, y1), pinned);
            prop_assert!(crop.width >= 1);
            prop_assert!(crop.height >= 1);
            prop_assert!(crop.right() <= img.width as u64, "{} in {}", crop, img);
            prop_assert!(crop.bottom() <= img.height as u64, "{} in {}", crop, img);
        }

        /// Property: box -> canvas -> box is stable within one displayed pixel.
        #[test]
        fn prop_round_trip_within_display_pixel(
            (img, crop) in image_and_box(),
            cv in canvas_strategy(),
        ) {
            let display = display_rect(img, cv);
            // One displayed pixel, plus one for the two truncated canvas edges
            let tol_x = display.scale_to_image_x(img).ceil().max(1.0) as i64 + 1;
            let tol_y = display.scale_to_image_y(img).ceil().max(1.0) as i64 + 1;

            let on_canvas = crop_box_to_canvas(&crop, img, cv);
            let back = crop_box_from_canvas_drag(img, cv, on_canvas, None);

            prop_assert!((back.x as i64 - crop.x as i64).abs() <= tol_x);
            prop_assert!((back.y as i64 - crop.y as i64).abs() <= tol_y);
            prop_assert!((back.width as i64 - crop.width as i64).abs() <= tol_x);
            prop_assert!((back.height as i64 - crop.height as i64).abs() <= tol_y);
        }

        /// Property: without downscaling the round trip is exact to one pixel.
        #[test]
        fn prop_round_trip_upscaled_within_one_pixel(
            (w, h) in (16u32..=300, 16u32..=300),
            (cw, ch) in (600u32..=1600, 600u32..=1600),
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            fw in 0.0f64..1.0,
            fh in 0.0f64..1.0,
        ) {
            let img = image(w, h);
            let cv = canvas(cw, ch);
            let x = ((w - 1) as f64 * fx) as u32;
            let y = ((h - 1) as f64 * fy) as u32;
            let bw = 1 + ((w - x - 1) as f64 * fw) as u32;
            let bh = 1 + ((h - y - 1) as f64 * fh) as u32;
            let crop = CropBox::new(x, y, bw, bh);

            let back = crop_box_from_canvas_drag(img, cv, crop_box_to_canvas(&crop, img, cv), None);

            prop_assert!((back.x as i64 - crop.x as i64).abs() <= 1, "{} vs {}", back, crop);
            prop_assert!((back.y as i64 - crop.y as i64).abs() <= 1, "{} vs {}", back, crop);
            prop_assert!((back.width as i64 - crop.width as i64).abs() <= 1, "{} vs {}", back, crop);
            prop_assert!((back.height as i64 - crop.height as i64).abs() <= 1, "{} vs {}", back, crop);
        }

        /// Property: centered ratio boxes are centered, inside, and on ratio.
        #[test]
        fn prop_centered_ratio_box(img in image_strategy(), r in ratio_strategy()) {
            let crop = centered_crop_for_ratio(img, r);
            prop_assert!(crop.fits(img));
            prop_assert_eq!(crop.x, (img.width - crop.width) / 2);
            prop_assert_eq!(crop.y, (img.height - crop.height) / 2);
            prop_assert!(crop.width == img.width || crop.height == img.height);

            let drift = (crop.width as f64 - crop.height as f64 * r.value()).abs();
            prop_assert!(drift <= r.value().max(1.0) + 1e-6, "drift {} for {}", drift, crop);
        }
    }
}
