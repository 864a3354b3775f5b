//! Debug overlay for the gaze pipeline.
//!
//! The pipeline reports each measured eye through [`EyeDebugHook`]; drawing is
//! left to whoever implements it. [`FrameAnnotator`] renders the classic view:
//! eye outline, the line splitting the box in half, and the white-pixel count
//! of each half.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::eye::{EyeMeasurement, EyeSide};
use crate::font::{draw_text, GLYPH_HEIGHT};

pub trait EyeDebugHook {
    fn on_eye(&mut self, side: EyeSide, eye: &EyeMeasurement);
}

/// Discards every report
pub struct NoDebug;

impl EyeDebugHook for NoDebug {
    fn on_eye(&mut self, _side: EyeSide, _eye: &EyeMeasurement) {}
}

const OUTLINE: Rgb<u8> = Rgb([255, 255, 0]);
const DIVIDER: Rgb<u8> = Rgb([0, 0, 255]);
const LEFT_LABEL: Rgb<u8> = Rgb([0, 0, 255]);
const RIGHT_LABEL: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_SCALE: u32 = 2;

/// Draws eye measurements onto a copy of the frame
pub struct FrameAnnotator {
    canvas: RgbImage,
}

impl FrameAnnotator {
    pub fn new(frame: RgbImage) -> Self {
        Self { canvas: frame }
    }

    pub fn image(&self) -> &RgbImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbImage {
        self.canvas
    }
}

impl EyeDebugHook for FrameAnnotator {
    fn on_eye(&mut self, _side: EyeSide, eye: &EyeMeasurement) {
        let poly = &eye.polygon;
        for (i, a) in poly.iter().enumerate() {
            let b = &poly[(i + 1) % poly.len()];
            draw_line_segment_mut(
                &mut self.canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                OUTLINE,
            );
        }

        let b = &eye.bounds;
        let cx = ((b.x0 + b.x1) / 2) as f32;
        draw_line_segment_mut(
            &mut self.canvas,
            (cx, b.y0 as f32),
            (cx, b.y1 as f32),
            DIVIDER,
        );

        // Labels sit just above the box
        let text_y = b.y0 - 5 - (GLYPH_HEIGHT * LABEL_SCALE) as i32;
        draw_text(
            &mut self.canvas,
            b.x0,
            text_y,
            &format!("L:{}", eye.left_white),
            LEFT_LABEL,
            LABEL_SCALE,
        );
        draw_text(
            &mut self.canvas,
            b.x1 - 40,
            text_y,
            &format!("R:{}", eye.right_white),
            RIGHT_LABEL,
            LABEL_SCALE,
        );
    }
}
