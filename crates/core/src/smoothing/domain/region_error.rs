use thiserror::Error;

use crate::shared::face_region::PixelRect;

/// Why a single face region was left unsmoothed.
///
/// These never abort a frame: the pipeline logs them and moves on to the
/// next region.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("face region has non-finite coordinates")]
    NonFinite,
    #[error("face region ({x}, {y}, {width}, {height}) is implausibly far outside the frame")]
    OutOfRange {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    #[error("face region {rect:?} does not overlap the {frame_w}x{frame_h} frame")]
    OutsideFrame {
        rect: PixelRect,
        frame_w: u32,
        frame_h: u32,
    },
    #[error("feather mask is degenerate (inner radius {inner:.2}, outer radius {outer:.2})")]
    DegenerateMask { inner: f64, outer: f64 },
    #[error("smoothing filter failed: {0}")]
    Filter(String),
    #[error("smoothed image is {actual_w}x{actual_h}, expected {expected_w}x{expected_h}")]
    ExtentMismatch {
        actual_w: u32,
        actual_h: u32,
        expected_w: u32,
        expected_h: u32,
    },
}
