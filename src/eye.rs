//! Per-eye white-pixel asymmetry.
//!
//! The eye polygon is rasterized into a mask over its bounding box, the masked
//! grayscale pixels are binarized, and the ratio of white pixels in the left
//! half to the right half of the box is the eye's gaze ratio. Looking towards
//! one side exposes more sclera on the other.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::types::{FaceLandmarks, PixelPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EyeSide {
    Left,
    Right,
}

/// Half-open pixel box: columns `x0..x1`, rows `y0..y1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        (self.x1 - self.x0).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y1 - self.y0).max(0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Column splitting the box into its left and right halves
    pub fn split_x(&self) -> i32 {
        self.x0 + (self.width() / 2) as i32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EyeMeasurement {
    pub ratio: f32,
    pub left_white: u32,
    pub right_white: u32,
    pub bounds: BoundingBox,
    pub polygon: Vec<PixelPoint>,
}

/// Collects the eye contour from `face`; `None` if any index is missing.
pub fn eye_polygon(face: &FaceLandmarks, indices: &[usize]) -> Option<Vec<PixelPoint>> {
    indices.iter().map(|&i| face.point(i)).collect()
}

/// Bounding box of `polygon` clipped to a `width` x `height` frame.
pub fn polygon_bounds(polygon: &[PixelPoint], width: u32, height: u32) -> Option<BoundingBox> {
    let first = polygon.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in polygon {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }

    let (w, h) = (width as i32, height as i32);
    Some(BoundingBox {
        x0: x0.clamp(0, w),
        y0: y0.clamp(0, h),
        x1: x1.clamp(0, w),
        y1: y1.clamp(0, h),
    })
}

/// Measures one eye. Returns `None` when the polygon's box has no area
/// inside the frame, which callers treat as a closed eye.
pub fn measure_eye(
    gray: &GrayImage,
    polygon: &[PixelPoint],
    white_threshold: u8,
    epsilon: f32,
) -> Option<EyeMeasurement> {
    let bounds = polygon_bounds(polygon, gray.width(), gray.height())?;
    if bounds.is_empty() {
        return None;
    }

    let (w, h) = (bounds.width(), bounds.height());
    let mask = polygon_mask(polygon, &bounds);
    let half = w / 2;

    let mut left_white = 0u32;
    let mut right_white = 0u32;
    for y in 0..h {
        for x in 0..w {
            if mask.get_pixel(x, y)[0] == 0 {
                continue;
            }
            let value = gray.get_pixel(bounds.x0 as u32 + x, bounds.y0 as u32 + y)[0];
            if value > white_threshold {
                if x < half {
                    left_white += 1;
                } else {
                    right_white += 1;
                }
            }
        }
    }

    Some(EyeMeasurement {
        ratio: left_white as f32 / (right_white as f32 + epsilon),
        left_white,
        right_white,
        bounds,
        polygon: polygon.to_vec(),
    })
}

/// Filled polygon mask in the coordinate frame of `bounds`
fn polygon_mask(polygon: &[PixelPoint], bounds: &BoundingBox) -> GrayImage {
    let mut mask = GrayImage::new(bounds.width(), bounds.height());

    let mut vertices: Vec<Point<i32>> = polygon
        .iter()
        .map(|p| Point::new(p.x - bounds.x0, p.y - bounds.y0))
        .collect();
    // imageproc wants an open contour
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    if vertices.len() > 1 {
        draw_polygon_mut(&mut mask, &vertices, Luma([255u8]));
    }
    mask
}
