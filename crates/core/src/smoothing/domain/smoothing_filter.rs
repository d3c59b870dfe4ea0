use crate::shared::frame::Frame;

use super::smoothing_parameters::SmoothingParameters;

/// Domain interface for the image operator that smooths a face.
///
/// Returns a new image with the same extent as `image`; the pipeline
/// rejects results of any other size.
pub trait SmoothingFilter: Send {
    fn smooth(
        &self,
        image: &Frame,
        params: &SmoothingParameters,
    ) -> Result<Frame, Box<dyn std::error::Error>>;
}
