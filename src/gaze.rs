use anyhow::{Context, Result};
use image::{imageops, GrayImage, RgbImage};
use tracing::trace;

use crate::config::GazeConfig;
use crate::eye::{eye_polygon, measure_eye, EyeMeasurement, EyeSide};
use crate::landmarks::FaceLandmarkSource;
use crate::overlay::{EyeDebugHook, NoDebug};
use crate::pipeline::Pipeline;
use crate::smoothing::RatioHistory;
use crate::types::{FaceLandmarks, GazeReading, GazeZone, PipelineOutput};

/// Below `left` is Left, above `right` is Right, anything in between
/// (both ends inclusive) is Center.
pub fn classify_ratio(ratio: f32, left: f32, right: f32) -> GazeZone {
    if ratio < left {
        GazeZone::Left
    } else if ratio > right {
        GazeZone::Right
    } else {
        GazeZone::Center
    }
}

// =========================================================================
// Gaze Classifier
// Averages the two eye ratios, smooths over a trailing window, maps to a zone.
// =========================================================================

/// Zone classifier over per-eye ratios.
///
/// The ratio history is the only state. It grows on valid frames, is left
/// alone on closed-eye frames, and is never cleared on its own; a face that
/// disappears and comes back resumes with the same smoothing window.
#[derive(Debug, Clone)]
pub struct GazeClassifier {
    history: RatioHistory,
    left_threshold: f32,
    right_threshold: f32,
    last_ratio: Option<f32>,
}

impl Default for GazeClassifier {
    fn default() -> Self {
        Self::from_config(&GazeConfig::default())
    }
}

impl GazeClassifier {
    pub fn new(window: usize, left_threshold: f32, right_threshold: f32) -> Self {
        Self {
            history: RatioHistory::new(window),
            left_threshold,
            right_threshold,
            last_ratio: None,
        }
    }

    pub fn from_config(config: &GazeConfig) -> Self {
        Self::new(
            config.smoothing_window,
            config.left_threshold,
            config.right_threshold,
        )
    }

    /// One tick with both eyes' ratios; `None` for an eye with no measurable
    /// region. Either eye missing gives `Closed` and leaves the history as is.
    pub fn update(&mut self, left_eye: Option<f32>, right_eye: Option<f32>) -> GazeReading {
        let (Some(left), Some(right)) = (left_eye, right_eye) else {
            return GazeReading::Closed;
        };

        let ratio = (left + right) / 2.0;
        self.last_ratio = Some(ratio);
        self.history.push(ratio);

        let smoothed = self.history.mean().unwrap_or(ratio);
        GazeReading::Zone {
            zone: classify_ratio(smoothed, self.left_threshold, self.right_threshold),
            ratio: smoothed,
        }
    }

    pub fn history(&self) -> &RatioHistory {
        &self.history
    }

    /// Most recent unsmoothed gaze ratio
    pub fn last_ratio(&self) -> Option<f32> {
        self.last_ratio
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_ratio = None;
    }
}

// =========================================================================
// Gaze Pipeline
// Face landmark source + eye measurement + gaze classifier.
// =========================================================================
pub struct GazePipeline<S: FaceLandmarkSource> {
    source: S,
    classifier: GazeClassifier,
    left_eye: Vec<usize>,
    right_eye: Vec<usize>,
    white_threshold: u8,
    epsilon: f32,
}

impl<S: FaceLandmarkSource> GazePipeline<S> {
    pub fn new(source: S, config: &GazeConfig) -> Self {
        Self {
            source,
            classifier: GazeClassifier::from_config(config),
            left_eye: config.left_eye.clone(),
            right_eye: config.right_eye.clone(),
            white_threshold: config.white_threshold,
            epsilon: config.epsilon,
        }
    }

    pub fn classifier(&self) -> &GazeClassifier {
        &self.classifier
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// `Ok(None)` when no face was found; the history is untouched then.
    pub fn read(&mut self, frame: &RgbImage) -> Result<Option<GazeReading>> {
        self.read_with_hook(frame, &mut NoDebug)
    }

    /// Like [`read`](Self::read), reporting each measured eye to `hook`.
    pub fn read_with_hook(
        &mut self,
        frame: &RgbImage,
        hook: &mut dyn EyeDebugHook,
    ) -> Result<Option<GazeReading>> {
        let gray = imageops::grayscale(frame);
        self.read_gray(&gray, hook)
    }

    pub fn read_gray(
        &mut self,
        gray: &GrayImage,
        hook: &mut dyn EyeDebugHook,
    ) -> Result<Option<GazeReading>> {
        let face = self
            .source
            .detect(gray)
            .context("face landmark source failed")?;
        let Some(face) = face else {
            trace!("no face");
            return Ok(None);
        };

        let left = self.measure(gray, &face, EyeSide::Left, hook);
        let right = self.measure(gray, &face, EyeSide::Right, hook);

        let reading = self
            .classifier
            .update(left.map(|m| m.ratio), right.map(|m| m.ratio));
        trace!(state = reading.state(), ratio = ?reading.ratio(), "gaze reading");
        Ok(Some(reading))
    }

    fn measure(
        &self,
        gray: &GrayImage,
        face: &FaceLandmarks,
        side: EyeSide,
        hook: &mut dyn EyeDebugHook,
    ) -> Option<EyeMeasurement> {
        let indices = match side {
            EyeSide::Left => &self.left_eye,
            EyeSide::Right => &self.right_eye,
        };
        let polygon = eye_polygon(face, indices)?;
        let measurement = measure_eye(gray, &polygon, self.white_threshold, self.epsilon)?;
        hook.on_eye(side, &measurement);
        Some(measurement)
    }
}

impl<S: FaceLandmarkSource> Pipeline for GazePipeline<S> {
    fn name(&self) -> String {
        "Eye Gaze (Sclera Ratio)".to_string()
    }

    fn process(&mut self, frame: &RgbImage) -> Result<Option<PipelineOutput>> {
        Ok(self.read(frame)?.map(PipelineOutput::Gaze))
    }
}

/// Status panel text for a tick; no face reads as "detecting"
pub fn state_text(reading: Option<&GazeReading>) -> &'static str {
    reading.map_or("detecting", |r| r.state())
}

pub fn ratio_text(reading: Option<&GazeReading>) -> String {
    match reading.and_then(|r| r.ratio()) {
        Some(ratio) => format!("{:.2}", ratio),
        None => "--".to_string(),
    }
}
