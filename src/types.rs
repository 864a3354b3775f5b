use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point in normalized image-fraction space ([0, 1] on both axes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A 2D point in integer pixel space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One detected hand, as produced by the hand landmark model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub points: Vec<NormalizedPoint>,
}

impl HandLandmarks {
    pub fn new(points: Vec<NormalizedPoint>) -> Self {
        Self { points }
    }

    pub fn point(&self, index: usize) -> Option<NormalizedPoint> {
        self.points.get(index).copied()
    }

    /// Horizontal flip in normalized space (x -> 1 - x)
    pub fn mirrored(&self) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| NormalizedPoint::new(1.0 - p.x, p.y))
                .collect(),
        }
    }
}

/// One detected face: its region (when the detector reports one) and the
/// 68-point landmark layout in pixel coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    #[serde(default)]
    pub face: Option<Rect>,
    pub points: Vec<PixelPoint>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { face: None, points }
    }

    pub fn point(&self, index: usize) -> Option<PixelPoint> {
        self.points.get(index).copied()
    }

    /// Horizontal flip for a frame `width` pixels wide
    pub fn mirrored(&self, width: u32) -> Self {
        let max_x = width as i32 - 1;
        Self {
            face: self.face.map(|r| Rect::new(width as f32 - r.x - r.width, r.y, r.width, r.height)),
            points: self
                .points
                .iter()
                .map(|p| PixelPoint::new(max_x - p.x, p.y))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Swipe direction reported by the gesture classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "Swipe Up",
            Direction::Down => "Swipe Down",
            Direction::Left => "Swipe Left",
            Direction::Right => "Swipe Right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GazeZone {
    Left,
    Center,
    Right,
}

impl GazeZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            GazeZone::Left => "left",
            GazeZone::Center => "center",
            GazeZone::Right => "right",
        }
    }
}

impl fmt::Display for GazeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one gaze tick on a frame where a face was found.
///
/// `Closed` carries no ratio: at least one eye had no measurable region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GazeReading {
    Zone { zone: GazeZone, ratio: f32 },
    Closed,
}

impl GazeReading {
    pub fn state(&self) -> &'static str {
        match self {
            GazeReading::Zone { zone, .. } => zone.as_str(),
            GazeReading::Closed => "closed",
        }
    }

    pub fn zone(&self) -> Option<GazeZone> {
        match self {
            GazeReading::Zone { zone, .. } => Some(*zone),
            GazeReading::Closed => None,
        }
    }

    /// Smoothed ratio that produced the zone
    pub fn ratio(&self) -> Option<f32> {
        match self {
            GazeReading::Zone { ratio, .. } => Some(*ratio),
            GazeReading::Closed => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    Swipe(Direction),
    Gaze(GazeReading),
}
