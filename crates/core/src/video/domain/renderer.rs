use crate::shared::frame::Frame;
use crate::shared::rect::Rect;
use crate::steering::directive::Directive;

/// Shows annotated frames to the operator.
///
/// Implementations own the display surface and the quit controls; the
/// pipeline hands over the processing-resolution frame plus whatever was
/// tracked this frame and never touches the display directly.
pub trait Renderer {
    /// Annotates a copy of the frame with the tracked rectangle and the
    /// steering directive (when present) and shows it.
    fn present(
        &mut self,
        frame: &Frame,
        target: Option<Rect>,
        directive: Option<Directive>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// True once the operator asked to stop: quit key pressed or window
    /// closed.
    fn quit_requested(&self) -> bool;

    /// Tears the display down. Idempotent.
    fn close(&mut self);
}
