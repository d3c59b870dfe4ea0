use std::cell::RefCell;

use crate::shared::frame::Frame;
use crate::smoothing::domain::smoothing_filter::SmoothingFilter;
use crate::smoothing::domain::smoothing_parameters::SmoothingParameters;

use super::gaussian;

/// Skin smoothing as a Gaussian low-pass mixed back into the source:
/// `out = src + amount * (blur(src, radius) - src)`.
///
/// The radius is used directly as the Gaussian sigma. Scratch space is
/// reused across calls, so one instance should stay on one thread.
#[derive(Default)]
pub struct GaussianSmoothingFilter {
    temp: RefCell<Vec<f32>>,
}

impl GaussianSmoothingFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmoothingFilter for GaussianSmoothingFilter {
    fn smooth(
        &self,
        image: &Frame,
        params: &SmoothingParameters,
    ) -> Result<Frame, Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&params.amount) {
            return Err(format!("amount must be within 0.0..=1.0, got {}", params.amount).into());
        }
        if params.amount == 0.0 || params.radius <= 0.0 {
            return Ok(image.clone());
        }

        let width = image.width() as usize;
        let height = image.height() as usize;
        let channels = image.channels() as usize;
        let kernel = gaussian::kernel_for_sigma(params.radius);

        let mut temp = self.temp.borrow_mut();
        let blurred = gaussian::blur_separable(image.data(), width, height, channels, &kernel, &mut temp);

        let amount = params.amount as f32;
        let data = image
            .data()
            .iter()
            .zip(&blurred)
            .map(|(&src, &low)| {
                let src = src as f32;
                (src + amount * (low - src)).round().clamp(0.0, 255.0) as u8
            })
            .collect();

        Ok(Frame::new(
            data,
            image.width(),
            image.height(),
            image.channels(),
            image.index(),
        ))
    }
}
