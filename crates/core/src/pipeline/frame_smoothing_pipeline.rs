use crate::pipeline::region_order::order_regions;
use crate::pipeline::smoothing_config::{SmoothingConfig, SmoothingScope};
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::{Frame, FrameError};
use crate::smoothing::domain::feather_mask::FeatherMask;
use crate::smoothing::domain::mask_blend::blend_masked;
use crate::smoothing::domain::region_error::RegionError;
use crate::smoothing::domain::smoothing_filter::SmoothingFilter;
use crate::smoothing::domain::smoothing_parameters::SmoothingParameters;

/// Per-frame face smoothing: for each face, smooth it, feather it with a
/// radial mask, and blend it over the running result.
///
/// The pipeline holds no per-frame state; everything that varies between
/// calls comes in through [`SmoothingConfig`].
pub struct FrameSmoothingPipeline {
    filter: Box<dyn SmoothingFilter>,
}

impl FrameSmoothingPipeline {
    pub fn new(filter: Box<dyn SmoothingFilter>) -> Self {
        Self { filter }
    }

    /// Returns a new frame with every face smoothed, same extent as `frame`.
    ///
    /// Faces are composited sequentially, so in overlap zones the face
    /// applied last wins. A face that cannot be processed is left as is;
    /// only an inconsistent input frame fails the whole call.
    pub fn process(
        &self,
        frame: &Frame,
        regions: &[FaceRegion],
        config: &SmoothingConfig,
    ) -> Result<Frame, FrameError> {
        frame.validate()?;

        let mut accumulator = frame.clone();
        if !config.enabled || regions.is_empty() {
            return Ok(accumulator);
        }

        for (i, region) in order_regions(regions, config.order).into_iter().enumerate() {
            if let Err(e) = self.apply_region(&mut accumulator, region, config) {
                log::warn!("Frame {}: skipping face {i}: {e}", frame.index());
            }
        }

        Ok(accumulator)
    }

    /// Smooths one face into `accumulator` in place.
    ///
    /// On error the accumulator is unchanged.
    pub fn apply_region(
        &self,
        accumulator: &mut Frame,
        region: &FaceRegion,
        config: &SmoothingConfig,
    ) -> Result<(), RegionError> {
        if !region.is_finite() {
            return Err(RegionError::NonFinite);
        }
        if !region.is_in_range() {
            return Err(RegionError::OutOfRange {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            });
        }

        let (frame_w, frame_h) = accumulator.extent();
        let face = region.to_pixel_rect(frame_w, frame_h);
        let outside = || RegionError::OutsideFrame {
            rect: face,
            frame_w,
            frame_h,
        };
        face.clamp_to(frame_w, frame_h).ok_or_else(outside)?;

        let params = SmoothingParameters::for_face_width(
            face.width as f64,
            config.amount,
            config.radius_scale,
            config.reference_width,
        );

        let mut mask = FeatherMask::for_face(&face, &config.mask)?;
        if config.preserve_features {
            if let Some(landmarks) = &region.landmarks {
                mask = mask.with_holes(landmarks.to_pixel_polygons(&face));
            }
        }
        let bounds = mask.bounds(frame_w, frame_h).ok_or_else(outside)?;

        log::debug!(
            "Frame {}: face {:?} radius={:.3} amount={:.2}",
            accumulator.index(),
            face,
            params.radius,
            params.amount
        );

        let (input, origin) = match config.scope {
            SmoothingScope::Region => (accumulator.crop(bounds), (bounds.x, bounds.y)),
            SmoothingScope::Frame => (accumulator.clone(), (0, 0)),
        };
        let smoothed = self
            .filter
            .smooth(&input, &params)
            .map_err(|e| RegionError::Filter(e.to_string()))?;
        if smoothed.extent() != input.extent() {
            return Err(RegionError::ExtentMismatch {
                actual_w: smoothed.width(),
                actual_h: smoothed.height(),
                expected_w: input.width(),
                expected_h: input.height(),
            });
        }

        blend_masked(accumulator, &smoothed, origin, bounds, &mask)
    }
}
