//! Zero Sense
//!
//! Turns per-frame landmark streams into discrete symbols:
//! - hand landmarks -> swipe direction (`gesture`)
//! - face landmarks -> gaze zone (`gaze`, built on `eye` and `smoothing`)
//!
//! Landmark detection itself sits behind the traits in `landmarks`.

pub mod config;
pub mod error;
pub mod eye;
pub mod font;
pub mod gaze;
pub mod gesture;
pub mod landmarks;
pub mod logging;
pub mod overlay;
pub mod pipeline;
pub mod smoothing;
pub mod types;

pub use error::{SenseError, SenseResult};
