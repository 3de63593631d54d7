//! Drawing labelled face boxes over an image.

use ab_glyph::{FontArc, PxScale};
use facecrop_models::{BoundingBox, DetectionResult};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

const BOX_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LABEL_FONT_SIZE: f32 = 20.0;
const LABEL_PADDING: i32 = 2;
const LABEL_CHAR_WIDTH: f32 = 0.55; // average glyph width as a fraction of font size

/// How face boxes are drawn.
#[derive(Clone)]
pub struct OverlayStyle {
    pub color: Rgba<u8>,
    pub thickness: u32,
    pub font_size: f32,
    /// Labels are only rendered when a font is supplied.
    pub font: Option<FontArc>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: BOX_COLOR,
            thickness: 2,
            font_size: LABEL_FONT_SIZE,
            font: None,
        }
    }
}

impl OverlayStyle {
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }
}

fn to_rect(bbox: &BoundingBox, inset: u32) -> Option<Rect> {
    let inset = inset as f64;
    let width = bbox.width - 2.0 * inset;
    let height = bbox.height - 2.0 * inset;
    // Also rejects NaN extents
    if !(width >= 1.0 && height >= 1.0) {
        return None;
    }
    Some(
        Rect::at((bbox.x + inset).round() as i32, (bbox.y + inset).round() as i32)
            .of_size(width.round() as u32, height.round() as u32),
    )
}

/// Background box of a label, sitting above the face box when there is room
/// and inside its top edge otherwise.
fn label_box(bbox: &BoundingBox, text: &str, font_size: f32) -> Option<Rect> {
    if text.is_empty() || !(font_size > 0.0 && font_size.is_finite()) {
        return None;
    }
    if !(bbox.x.is_finite() && bbox.y.is_finite()) {
        return None;
    }

    let text_height = font_size.ceil() as i32 + 2 * LABEL_PADDING;
    let text_width =
        (text.chars().count() as f32 * font_size * LABEL_CHAR_WIDTH).ceil() as i32 + 2 * LABEL_PADDING;

    let x = bbox.x.round() as i32;
    let top = bbox.y.round() as i32;
    let y = if top >= text_height { top - text_height } else { top };

    Some(Rect::at(x, y).of_size(text_width as u32, text_height as u32))
}

fn draw_label(canvas: &mut RgbaImage, bbox: &BoundingBox, text: &str, style: &OverlayStyle, font: &FontArc) {
    let Some(rect) = label_box(bbox, text, style.font_size) else {
        return;
    };

    draw_filled_rect_mut(canvas, rect, style.color);
    draw_text_mut(
        canvas,
        TEXT_COLOR,
        rect.left() + LABEL_PADDING,
        rect.top() + LABEL_PADDING,
        PxScale::from(style.font_size),
        font,
        text,
    );
}

/// Return a copy of `image` with every face box, and its label when a font
/// is available, drawn on top.
pub fn draw_overlay(image: &DynamicImage, result: &DetectionResult, style: &OverlayStyle) -> RgbaImage {
    let mut canvas = image.to_rgba8();

    for face in &result.faces {
        for inset in 0..style.thickness.max(1) {
            if let Some(rect) = to_rect(&face.bounding_box, inset) {
                draw_hollow_rect_mut(&mut canvas, rect, style.color);
            }
        }
        if let Some(font) = &style.font {
            draw_label(&mut canvas, &face.bounding_box, &face.display_label(), style, font);
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use facecrop_models::{Descriptor, FaceMatch, LabeledFace};

    fn result_with(bbox: BoundingBox) -> DetectionResult {
        DetectionResult::new(vec![LabeledFace {
            bounding_box: bbox,
            descriptor: Descriptor::new(vec![0.0]),
            matched_label: FaceMatch::unknown(0.9),
        }])
    }

    #[test]
    fn test_draws_box_edges_only() {
        let image = DynamicImage::new_rgba8(50, 50);
        let canvas = draw_overlay(
            &image,
            &result_with(BoundingBox::new(10.0, 10.0, 20.0, 20.0)),
            &OverlayStyle::default(),
        );

        assert_eq!(*canvas.get_pixel(10, 10), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(11, 15), BOX_COLOR); // second stroke
        assert_eq!(*canvas.get_pixel(29, 20), BOX_COLOR);
        assert_eq!(*canvas.get_pixel(20, 20), Rgba([0, 0, 0, 0]));
        assert_eq!(*canvas.get_pixel(5, 5), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_degenerate_boxes_are_skipped() {
        let image = DynamicImage::new_rgba8(10, 10);
        let canvas = draw_overlay(
            &image,
            &result_with(BoundingBox::new(2.0, 2.0, 0.0, 0.0)),
            &OverlayStyle::default(),
        );
        assert!(canvas.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_nan_boxes_are_skipped() {
        let image = DynamicImage::new_rgba8(10, 10);
        for bbox in [
            BoundingBox::new(2.0, 2.0, f64::NAN, 5.0),
            BoundingBox::new(2.0, 2.0, 5.0, f64::NAN),
        ] {
            assert!(to_rect(&bbox, 0).is_none());
            let canvas = draw_overlay(&image, &result_with(bbox), &OverlayStyle::default());
            assert!(canvas.pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
        }
    }

    #[test]
    fn test_label_sits_above_box_when_room() {
        // 20px font: 24px tall, "unknown (0.9)" is 13 chars wide at 11px each
        let rect = label_box(&BoundingBox::new(10.0, 40.0, 30.0, 30.0), "unknown (0.9)", 20.0).unwrap();
        assert_eq!((rect.left(), rect.top()), (10, 16));
        assert_eq!((rect.width(), rect.height()), (147, 24));
    }

    #[test]
    fn test_label_moves_inside_box_near_top_edge() {
        let rect = label_box(&BoundingBox::new(5.0, 10.0, 30.0, 30.0), "a", 20.0).unwrap();
        assert_eq!((rect.left(), rect.top()), (5, 10));
        assert_eq!((rect.width(), rect.height()), (15, 24));

        let rect = label_box(&BoundingBox::new(5.0, 24.0, 30.0, 30.0), "a", 20.0).unwrap();
        assert_eq!(rect.top(), 0);
    }

    #[test]
    fn test_label_rejects_unusable_input() {
        let bbox = BoundingBox::new(5.0, 30.0, 10.0, 10.0);
        assert!(label_box(&bbox, "", 20.0).is_none());
        assert!(label_box(&bbox, "a", 0.0).is_none());
        assert!(label_box(&bbox, "a", f32::NAN).is_none());
        assert!(label_box(&BoundingBox::new(f64::NAN, 30.0, 10.0, 10.0), "a", 20.0).is_none());
    }

    #[test]
    fn test_empty_result_leaves_image_untouched() {
        let image = DynamicImage::new_rgba8(10, 10);
        let canvas = draw_overlay(&image, &DetectionResult::default(), &OverlayStyle::default());
        assert_eq!(canvas, image.to_rgba8());
    }
}
