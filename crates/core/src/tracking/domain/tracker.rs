use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Seeds single-target tracking sessions.
///
/// One session follows one region. The controller holds at most one live
/// session at a time; seeding again simply produces a fresh session and the
/// old one is dropped.
pub trait Tracker {
    /// Start following `seed` (processing-frame coordinates, possibly
    /// extending outside the frame) as it appears in `frame`.
    fn start_track(
        &mut self,
        frame: &Frame,
        seed: Rect,
    ) -> Result<Box<dyn TrackerSession>, Box<dyn std::error::Error>>;
}

/// A live single-target tracking session.
///
/// Created by [`Tracker::start_track`], advanced once per frame, dropped as
/// soon as the caller gives up on the target.
pub trait TrackerSession {
    /// Advance the session by one frame and return the quality score for
    /// the new estimate. The scale is tracker-defined; callers compare it
    /// against a configured floor.
    fn update(&mut self, frame: &Frame) -> Result<f64, Box<dyn std::error::Error>>;

    /// Current estimate of the tracked region.
    fn position(&self) -> Rect;
}
