use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{SenseError, SenseResult};
use crate::landmarks::{INDEX_FINGER_TIP, LEFT_EYE, RIGHT_EYE};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gesture: GestureConfig,
    pub gaze: GazeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Dead zone in normalized units; the dominant-axis displacement must exceed it
    pub threshold: f32,
    /// Hand landmark tracked across frames (index fingertip in the 21-point layout)
    pub landmark_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazeConfig {
    pub smoothing_window: usize,
    pub left_threshold: f32,
    pub right_threshold: f32,
    /// Pixels strictly brighter than this count as white
    pub white_threshold: u8,
    pub epsilon: f32,
    pub left_eye: Vec<usize>,
    pub right_eye: Vec<usize>,
    pub debug_overlay: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "zero_sense=debug,warn"
    pub level: String,
    pub json: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: 0.02,
            landmark_index: INDEX_FINGER_TIP,
        }
    }
}

impl Default for GazeConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 5,
            left_threshold: 0.75,
            right_threshold: 1.25,
            white_threshold: 70,
            epsilon: 1e-6,
            left_eye: LEFT_EYE.to_vec(),
            right_eye: RIGHT_EYE.to_vec(),
            debug_overlay: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "zero_sense.json";

    /// Loads the config at `path`. A missing or unparsable file falls back to
    /// defaults; a file that parses but fails validation is an error.
    pub fn load(path: impl AsRef<Path>) -> SenseResult<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = fs::read_to_string(path)?;
            // Missing fields are filled from Default via #[serde(default)]
            match serde_json::from_str::<AppConfig>(&content) {
                Ok(c) => {
                    info!(path = %path.display(), "loaded configuration");
                    c
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "error parsing config, using defaults");
                    Self::default()
                }
            }
        } else {
            info!(path = %path.display(), "configuration file not found, using defaults");
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> SenseResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> SenseResult<()> {
        let g = &self.gesture;
        if !g.threshold.is_finite() || g.threshold <= 0.0 {
            return Err(SenseError::config(format!(
                "gesture.threshold must be a positive number, got {}",
                g.threshold
            )));
        }

        let z = &self.gaze;
        if z.smoothing_window == 0 {
            return Err(SenseError::config("gaze.smoothing_window must be at least 1"));
        }
        if z.left_threshold > z.right_threshold {
            return Err(SenseError::config(format!(
                "gaze.left_threshold ({}) must not exceed gaze.right_threshold ({})",
                z.left_threshold, z.right_threshold
            )));
        }
        if !z.epsilon.is_finite() || z.epsilon <= 0.0 {
            return Err(SenseError::config("gaze.epsilon must be a positive number"));
        }
        for (name, eye) in [("left_eye", &z.left_eye), ("right_eye", &z.right_eye)] {
            if eye.len() != 6 {
                return Err(SenseError::config(format!(
                    "gaze.{} must list exactly 6 landmark indices, got {}",
                    name,
                    eye.len()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calibration_constants() {
        let config = AppConfig::default();
        assert_eq!(config.gesture.threshold, 0.02);
        assert_eq!(config.gesture.landmark_index, 8);
        assert_eq!(config.gaze.smoothing_window, 5);
        assert_eq!(config.gaze.left_threshold, 0.75);
        assert_eq!(config.gaze.right_threshold, 1.25);
        assert_eq!(config.gaze.white_threshold, 70);
        assert_eq!(config.gaze.left_eye, vec![36, 37, 38, 39, 40, 41]);
        assert_eq!(config.gaze.right_eye, vec![42, 43, 44, 45, 46, 47]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "gaze": { "smoothing_window": 3 } }"#).unwrap();
        assert_eq!(config.gaze.smoothing_window, 3);
        assert_eq!(config.gaze.right_threshold, 1.25);
        assert_eq!(config.gesture, GestureConfig::default());
    }

    #[test]
    fn rejects_inverted_gaze_thresholds() {
        let mut config = AppConfig::default();
        config.gaze.left_threshold = 1.5;
        assert!(matches!(config.validate(), Err(SenseError::Config { .. })));
    }

    #[test]
    fn rejects_bad_eye_layout_and_window() {
        let mut config = AppConfig::default();
        config.gaze.left_eye.pop();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.gaze.smoothing_window = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.gesture.threshold = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero_sense.json");

        let mut config = AppConfig::default();
        config.gesture.threshold = 0.05;
        config.logging.json = true;
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_or_garbled_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert_eq!(AppConfig::load(&missing).unwrap(), AppConfig::default());

        let garbled = dir.path().join("garbled.json");
        fs::write(&garbled, "{ not json").unwrap();
        assert_eq!(AppConfig::load(&garbled).unwrap(), AppConfig::default());
    }
}
