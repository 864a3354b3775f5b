//! Error types for landmark sources, traces, and configuration.

use std::path::PathBuf;

/// Library-level error. Classification never produces one of these; they come
/// from the collaborators around it (sources, trace files, config).
#[derive(Debug, thiserror::Error)]
pub enum SenseError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Landmark source error: {message}")]
    Source { message: String },

    #[error("Trace error: {message}")]
    Trace { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type SenseResult<T> = Result<T, SenseError>;

impl SenseError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn landmark_source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace {
            message: msg.into(),
        }
    }
}
