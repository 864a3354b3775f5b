use anyhow::{Context, Result};
use image::RgbImage;
use tracing::debug;

use crate::config::GestureConfig;
use crate::landmarks::HandLandmarkSource;
use crate::pipeline::Pipeline;
use crate::types::{Direction, NormalizedPoint, PipelineOutput};

// =========================================================================
// Swipe Tracker
// Frame-to-frame displacement of one landmark, mapped through a dead zone.
// =========================================================================

/// Tracks a single landmark across consecutive frames.
///
/// `previous` is `None` at startup and after any frame without a detection,
/// so at least two consecutive detected frames are needed before a swipe can
/// fire. Displacement is measured between neighbouring frames, which makes
/// this an instantaneous-velocity detector: a long swipe fires on every frame
/// whose step exceeds the threshold.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    previous: Option<NormalizedPoint>,
    threshold: f32,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default().threshold)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            previous: None,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn previous_position(&self) -> Option<NormalizedPoint> {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Feed one frame's landmark position (`None` when the hand was not found).
    pub fn update(&mut self, position: Option<NormalizedPoint>) -> Option<Direction> {
        let Some(current) = position else {
            if self.previous.take().is_some() {
                debug!("hand lost, tracking reset");
            }
            return None;
        };

        let gesture = self.previous.and_then(|prev| {
            classify_displacement(current.x - prev.x, current.y - prev.y, self.threshold)
        });

        self.previous = Some(current);
        gesture
    }
}

/// Maps a displacement to a direction.
///
/// The horizontal branch is taken only when `|dx| > |dy|`; ties go to the
/// vertical branch. Image coordinates grow downwards, so positive `dy` is Down.
pub fn classify_displacement(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > threshold {
            Some(Direction::Right)
        } else if dx < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > threshold {
        Some(Direction::Down)
    } else if dy < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}

// =========================================================================
// Gesture Pipeline
// Hand landmark source + swipe tracker on the index fingertip.
// =========================================================================
pub struct GesturePipeline<S: HandLandmarkSource> {
    source: S,
    tracker: SwipeTracker,
    landmark_index: usize,
}

impl<S: HandLandmarkSource> GesturePipeline<S> {
    pub fn new(source: S, config: &GestureConfig) -> Self {
        Self {
            source,
            tracker: SwipeTracker::new(config.threshold),
            landmark_index: config.landmark_index,
        }
    }

    pub fn tracker(&self) -> &SwipeTracker {
        &self.tracker
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs the source on `frame` and classifies the tracked landmark.
    ///
    /// A hand whose landmark set lacks the tracked index counts as no hand.
    pub fn classify(&mut self, frame: &RgbImage) -> Result<Option<Direction>> {
        let hand = self
            .source
            .detect(frame)
            .context("hand landmark source failed")?;
        let tip = hand.and_then(|h| h.point(self.landmark_index));

        let gesture = self.tracker.update(tip);
        if let Some(direction) = gesture {
            debug!(gesture = %direction, "swipe detected");
        }
        Ok(gesture)
    }
}

impl<S: HandLandmarkSource> Pipeline for GesturePipeline<S> {
    fn name(&self) -> String {
        "Hand Swipe (Index Fingertip)".to_string()
    }

    fn process(&mut self, frame: &RgbImage) -> Result<Option<PipelineOutput>> {
        Ok(self.classify(frame)?.map(PipelineOutput::Swipe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Option<NormalizedPoint> {
        Some(NormalizedPoint::new(x, y))
    }

    #[test]
    fn first_frame_never_fires() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.update(at(0.1, 0.1)), None);
        assert_eq!(tracker.previous_position(), at(0.1, 0.1));
    }

    #[test]
    fn hold_then_step_right() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.update(at(0.5, 0.5)), None);
        assert_eq!(tracker.update(at(0.5, 0.5)), None);
        assert_eq!(tracker.update(at(0.54, 0.5)), Some(Direction::Right));
    }

    #[test]
    fn all_four_directions() {
        assert_eq!(classify_displacement(0.05, 0.01, 0.02), Some(Direction::Right));
        assert_eq!(classify_displacement(-0.05, 0.01, 0.02), Some(Direction::Left));
        assert_eq!(classify_displacement(0.01, 0.05, 0.02), Some(Direction::Down));
        assert_eq!(classify_displacement(0.01, -0.05, 0.02), Some(Direction::Up));
    }

    #[test]
    fn dead_zone_suppresses_small_steps() {
        assert_eq!(classify_displacement(0.02, 0.0, 0.02), None);
        assert_eq!(classify_displacement(-0.015, 0.001, 0.02), None);
        assert_eq!(classify_displacement(0.0, 0.02, 0.02), None);
    }

    #[test]
    fn ties_take_the_vertical_branch() {
        assert_eq!(classify_displacement(0.05, 0.05, 0.02), Some(Direction::Down));
        assert_eq!(classify_displacement(0.05, -0.05, 0.02), Some(Direction::Up));
        assert_eq!(classify_displacement(-0.05, 0.05, 0.02), Some(Direction::Down));
    }

    #[test]
    fn horizontal_dominant_below_threshold_does_not_fall_through() {
        // dx dominates but is inside the dead zone; dy alone would not fire either
        assert_eq!(classify_displacement(0.019, 0.018, 0.02), None);
    }

    #[test]
    fn gap_resets_tracking() {
        let mut tracker = SwipeTracker::default();
        tracker.update(at(0.1, 0.5));
        assert_eq!(tracker.update(None), None);
        assert_eq!(tracker.previous_position(), None);
        // Large jump right after the gap is the new baseline, not a swipe
        assert_eq!(tracker.update(at(0.9, 0.5)), None);
        assert_eq!(tracker.update(at(0.95, 0.5)), Some(Direction::Right));
    }

    #[test]
    fn continuous_motion_fires_every_frame() {
        let mut tracker = SwipeTracker::default();
        tracker.update(at(0.5, 0.9));
        let fired: Vec<_> = [0.85, 0.80, 0.75]
            .iter()
            .map(|&y| tracker.update(at(0.5, y)))
            .collect();
        assert_eq!(fired, vec![Some(Direction::Up); 3]);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let mut tracker = SwipeTracker::new(0.1);
        tracker.update(at(0.5, 0.5));
        assert_eq!(tracker.update(at(0.55, 0.5)), None);
        assert_eq!(tracker.update(at(0.7, 0.5)), Some(Direction::Right));
    }

    #[test]
    fn explicit_reset_forgets_previous() {
        let mut tracker = SwipeTracker::default();
        tracker.update(at(0.5, 0.5));
        tracker.reset();
        assert_eq!(tracker.update(at(0.9, 0.5)), None);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn equal_consecutive_positions_never_fire(x in 0.0f32..1.0, y in 0.0f32..1.0) {
                let mut tracker = SwipeTracker::default();
                tracker.update(at(x, y));
                prop_assert_eq!(tracker.update(at(x, y)), None);
            }

            #[test]
            fn first_position_after_gap_never_fires(
                a in (0.0f32..1.0, 0.0f32..1.0),
                b in (0.0f32..1.0, 0.0f32..1.0),
            ) {
                let mut tracker = SwipeTracker::default();
                tracker.update(at(a.0, a.1));
                tracker.update(None);
                prop_assert_eq!(tracker.update(at(b.0, b.1)), None);
            }

            #[test]
            fn steps_inside_dead_zone_never_fire(dx in -0.02f32..=0.02, dy in -0.02f32..=0.02) {
                prop_assert_eq!(classify_displacement(dx, dy, 0.02), None);
            }
        }
    }
}
