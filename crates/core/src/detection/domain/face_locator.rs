use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Finds candidate face rectangles in a single frame.
///
/// Stateless per call: every invocation is independent and the returned
/// order is unspecified. Rectangles are in processing-frame pixel
/// coordinates. Implementations take `&mut self` because detection engines
/// reuse internal scratch buffers.
pub trait FaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>>;
}
