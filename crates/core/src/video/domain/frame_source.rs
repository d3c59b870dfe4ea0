use crate::shared::frame::Frame;

/// Delivers frames in capture order.
///
/// Implementations handle decoding and pixel-format conversion; the
/// pipeline only ever sees RGB [`Frame`]s.
pub trait FrameSource: Send {
    /// Number of frames the source will yield, when known up front.
    fn frame_count(&self) -> Option<usize>;

    /// Yields frames until the source is exhausted. A failed frame does not
    /// end the stream.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;
}
