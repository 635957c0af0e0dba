use crate::shared::frame::Frame;

/// Delivers live frames from a capture device.
///
/// Implementations handle device selection and pixel format decoding
/// while the pipeline works with the abstract `Frame` type. The stream
/// has no known end; every call blocks until the device produces a frame
/// or fails.
pub trait FrameSource {
    /// Blocks until the next frame is available.
    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Releases the capture device. Idempotent.
    fn close(&mut self);
}
