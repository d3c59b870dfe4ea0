use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_smoothing_pipeline::FrameSmoothingPipeline;
use crate::pipeline::smoothing_config::SmoothingConfig;
use crate::video::domain::display_surface::DisplaySurface;
use crate::video::domain::frame_source::FrameSource;

/// Single-image smoothing: read → detect → smooth → present.
pub struct SmoothImageUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    pipeline: FrameSmoothingPipeline,
    surface: Box<dyn DisplaySurface>,
}

impl SmoothImageUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        pipeline: FrameSmoothingPipeline,
        surface: Box<dyn DisplaySurface>,
    ) -> Self {
        Self {
            source,
            detector,
            pipeline,
            surface,
        }
    }

    /// Smooths the first frame of the source and presents it. Returns the
    /// number of faces that were detected.
    pub fn execute(&mut self, config: &SmoothingConfig) -> Result<usize, Box<dyn std::error::Error>> {
        let frame = self.source.frames().next().ok_or("No frames in input")??;

        let regions = match self.detector.detect(&frame) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("Detection failed, writing input unchanged: {e}");
                Vec::new()
            }
        };
        log::info!("Smoothing {} face(s)", regions.len());

        let composed = self.pipeline.process(&frame, &regions, config)?;
        self.surface.present(&composed)?;

        Ok(regions.len())
    }
}
