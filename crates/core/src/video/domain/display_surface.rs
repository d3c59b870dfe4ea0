use crate::shared::frame::Frame;

/// Receives composed frames, one per call, each replacing the last.
pub trait DisplaySurface {
    fn present(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;
}
