use crate::types::PipelineOutput;
use anyhow::Result;
use image::RgbImage;

/// One frame in, at most one symbol out.
///
/// `Ok(None)` is the normal "nothing to report" outcome (no subject in view,
/// or no gesture this frame). Errors only come from the landmark source.
pub trait Pipeline {
    fn name(&self) -> String;
    fn process(&mut self, frame: &RgbImage) -> Result<Option<PipelineOutput>>;
}
