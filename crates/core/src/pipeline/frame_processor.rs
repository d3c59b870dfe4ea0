use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_smoothing_pipeline::FrameSmoothingPipeline;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::pipeline::smoothing_config::SmoothingConfig;
use crate::video::domain::display_surface::DisplaySurface;
use crate::video::domain::frame_source::FrameSource;

/// What happens to a new frame when the worker is still busy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverloadPolicy {
    /// Wait for the worker. Every frame is processed (offline input).
    #[default]
    Block,
    /// Discard the incoming frame (live input).
    DropNewest,
}

/// Configuration for one processing run.
pub struct ProcessorConfig {
    pub smoothing: SmoothingConfig,
    pub overload: OverloadPolicy,
    /// Checked between frames; set it to stop the run early.
    pub stop: Arc<AtomicBool>,
}

impl ProcessorConfig {
    pub fn new(smoothing: SmoothingConfig) -> Self {
        Self {
            smoothing,
            overload: OverloadPolicy::default(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_overload(mut self, overload: OverloadPolicy) -> Self {
        self.overload = overload;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub presented: usize,
    pub dropped: usize,
    /// Frames that could not be read or were inconsistent.
    pub failed: usize,
}

/// Drives frames from a source through detection and smoothing to a
/// display surface.
///
/// This is a port; infrastructure decides how the work is scheduled.
pub trait FrameProcessor: Send {
    fn run(
        &self,
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        pipeline: FrameSmoothingPipeline,
        surface: &mut dyn DisplaySurface,
        config: ProcessorConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<ProcessingStats, Box<dyn std::error::Error>>;
}
