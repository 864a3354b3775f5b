//! Landmark sources: the boundary to the perception models.
//!
//! Both pipelines pull exactly one landmark set per frame from a source. Real
//! detectors live outside this crate; the recorded sources here replay traces
//! captured earlier so the classifiers can run without a camera or a model.

use image::{GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use crate::error::{SenseError, SenseResult};
use crate::types::{FaceLandmarks, HandLandmarks};

/// Index fingertip in the 21-point hand layout
pub const INDEX_FINGER_TIP: usize = 8;

/// Eye contours in the 68-point face layout, six points each
pub const LEFT_EYE: [usize; 6] = [36, 37, 38, 39, 40, 41];
pub const RIGHT_EYE: [usize; 6] = [42, 43, 44, 45, 46, 47];

pub const HAND_LANDMARK_COUNT: usize = 21;
pub const FACE_LANDMARK_COUNT: usize = 68;

pub trait HandLandmarkSource {
    /// `Ok(None)` when no hand is in the frame
    fn detect(&mut self, frame: &RgbImage) -> SenseResult<Option<HandLandmarks>>;
}

pub trait FaceLandmarkSource {
    /// `Ok(None)` when no face is in the frame
    fn detect(&mut self, gray: &GrayImage) -> SenseResult<Option<FaceLandmarks>>;
}

impl<S: HandLandmarkSource + ?Sized> HandLandmarkSource for Box<S> {
    fn detect(&mut self, frame: &RgbImage) -> SenseResult<Option<HandLandmarks>> {
        (**self).detect(frame)
    }
}

impl<S: FaceLandmarkSource + ?Sized> FaceLandmarkSource for Box<S> {
    fn detect(&mut self, gray: &GrayImage) -> SenseResult<Option<FaceLandmarks>> {
        (**self).detect(gray)
    }
}

/// On-disk hand trace: frame size plus one entry per frame (`null` = no hand)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandTrace {
    #[serde(default = "HandTrace::default_width")]
    pub width: u32,
    #[serde(default = "HandTrace::default_height")]
    pub height: u32,
    pub frames: Vec<Option<HandLandmarks>>,
}

impl HandTrace {
    fn default_width() -> u32 {
        640
    }

    fn default_height() -> u32 {
        480
    }

    pub fn load(path: impl AsRef<Path>) -> SenseResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SenseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Replays recorded hand landmarks, one entry per `detect` call.
/// Frame contents are ignored.
#[derive(Debug, Default)]
pub struct RecordedHandSource {
    frames: VecDeque<Option<HandLandmarks>>,
    mirrored: bool,
}

impl RecordedHandSource {
    pub fn new(frames: impl IntoIterator<Item = Option<HandLandmarks>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            mirrored: false,
        }
    }

    /// Report every hand flipped horizontally
    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub fn push(&mut self, hand: Option<HandLandmarks>) {
        self.frames.push_back(hand);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl HandLandmarkSource for RecordedHandSource {
    fn detect(&mut self, _frame: &RgbImage) -> SenseResult<Option<HandLandmarks>> {
        let hand = self
            .frames
            .pop_front()
            .ok_or_else(|| SenseError::landmark_source("recorded hand trace exhausted"))?;
        Ok(match hand {
            Some(h) if self.mirrored => Some(h.mirrored()),
            other => other,
        })
    }
}

/// Replays recorded face landmarks, one entry per `detect` call.
#[derive(Debug, Default)]
pub struct RecordedFaceSource {
    frames: VecDeque<Option<FaceLandmarks>>,
}

impl RecordedFaceSource {
    pub fn new(frames: impl IntoIterator<Item = Option<FaceLandmarks>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn push(&mut self, face: Option<FaceLandmarks>) {
        self.frames.push_back(face);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FaceLandmarkSource for RecordedFaceSource {
    fn detect(&mut self, _gray: &GrayImage) -> SenseResult<Option<FaceLandmarks>> {
        self.frames
            .pop_front()
            .ok_or_else(|| SenseError::landmark_source("recorded face trace exhausted"))
    }
}

/// Reads a face sidecar file: `null` or a `FaceLandmarks` object
pub fn load_face_sidecar(path: impl AsRef<Path>) -> SenseResult<Option<FaceLandmarks>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NormalizedPoint, PixelPoint};

    fn blank() -> RgbImage {
        RgbImage::new(4, 4)
    }

    #[test]
    fn hand_source_replays_in_order_then_fails() {
        let hand = HandLandmarks::new(vec![NormalizedPoint::new(0.2, 0.4)]);
        let mut source = RecordedHandSource::new(vec![Some(hand.clone()), None]);

        assert_eq!(source.detect(&blank()).unwrap(), Some(hand));
        assert_eq!(source.detect(&blank()).unwrap(), None);
        assert_eq!(source.remaining(), 0);
        assert!(matches!(
            source.detect(&blank()),
            Err(SenseError::Source { .. })
        ));
    }

    #[test]
    fn mirrored_hand_source_flips_points() {
        let hand = HandLandmarks::new(vec![NormalizedPoint::new(0.2, 0.4)]);
        let mut source = RecordedHandSource::new(vec![Some(hand)]).mirrored(true);
        let got = source.detect(&blank()).unwrap().unwrap();
        assert!((got.points[0].x - 0.8).abs() < 1e-6);
        assert_eq!(got.points[0].y, 0.4);
    }

    #[test]
    fn face_source_replays_pushed_frames() {
        let mut source = RecordedFaceSource::default();
        source.push(None);
        source.push(Some(FaceLandmarks::new(vec![PixelPoint::new(1, 2)])));

        let gray = GrayImage::new(4, 4);
        assert_eq!(source.detect(&gray).unwrap(), None);
        assert_eq!(source.detect(&gray).unwrap().unwrap().points.len(), 1);
        assert!(source.detect(&gray).is_err());
    }

    #[test]
    fn hand_trace_parses_null_frames_and_defaults() {
        let json = r#"{ "frames": [ null, { "points": [ { "x": 0.5, "y": 0.5 } ] } ] }"#;
        let trace: HandTrace = serde_json::from_str(json).unwrap();
        assert_eq!(trace.width, 640);
        assert_eq!(trace.height, 480);
        assert_eq!(trace.frames.len(), 2);
        assert!(trace.frames[0].is_none());
    }

    #[test]
    fn face_sidecar_accepts_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_0001.json");
        fs::write(&path, "null").unwrap();
        assert_eq!(load_face_sidecar(&path).unwrap(), None);
    }
}
