use crate::detection::domain::face_locator::FaceLocator;
use crate::detection::domain::largest_face;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;
use crate::tracking::domain::tracker::{Tracker, TrackerSession};

/// Quality floor below which a tracking session is abandoned. Calibrated
/// against the peak-to-sidelobe scale of the shipped correlation tracker.
pub const DEFAULT_QUALITY_FLOOR: f64 = 8.75;

/// Horizontal padding applied to a detection before seeding the tracker.
pub const DEFAULT_SEED_PADDING_X: i32 = 10;

/// Vertical padding applied to a detection before seeding the tracker.
pub const DEFAULT_SEED_PADDING_Y: i32 = 20;

/// Tunables for [`TrackingController`], constructed once and never mutated.
#[derive(Clone, Copy, Debug)]
pub struct TrackingConfig {
    pub quality_floor: f64,
    pub seed_padding_x: i32,
    pub seed_padding_y: i32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            quality_floor: DEFAULT_QUALITY_FLOOR,
            seed_padding_x: DEFAULT_SEED_PADDING_X,
            seed_padding_y: DEFAULT_SEED_PADDING_Y,
        }
    }
}

/// Which mode the controller is in. Derived from session ownership, so the
/// two can never disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    Searching,
    Tracking,
}

/// Per-frame decision core: find the largest face, follow it, give it up.
///
/// In `Searching` every frame goes to the face locator. The largest
/// candidate by strict area comparison (first seen wins ties, zero area
/// never wins) becomes the target: its rectangle is padded and handed to
/// the tracker, and the controller switches to `Tracking` without emitting
/// a rectangle for that frame. In `Tracking` every frame goes to the live
/// session instead; the session's position is emitted while its quality
/// holds at or above the configured floor. One sub-floor frame drops the
/// session and falls straight back to `Searching`; there is no smoothing
/// or hysteresis beyond the floor itself.
pub struct TrackingController {
    locator: Box<dyn FaceLocator>,
    tracker: Box<dyn Tracker>,
    session: Option<Box<dyn TrackerSession>>,
    config: TrackingConfig,
}

impl TrackingController {
    pub fn new(
        locator: Box<dyn FaceLocator>,
        tracker: Box<dyn Tracker>,
        config: TrackingConfig,
    ) -> Self {
        Self {
            locator,
            tracker,
            session: None,
            config,
        }
    }

    pub fn state(&self) -> TrackingState {
        if self.session.is_some() {
            TrackingState::Tracking
        } else {
            TrackingState::Searching
        }
    }

    /// Process one frame. Returns the tracked rectangle when a target is
    /// being followed with sufficient quality, `None` otherwise. Locator
    /// and tracker errors propagate unchanged; the controller never
    /// retries either collaborator.
    pub fn on_frame(&mut self, frame: &Frame) -> Result<Option<Rect>, Box<dyn std::error::Error>> {
        match self.session.as_mut() {
            None => {
                let candidates = self.locator.locate(frame)?;
                let Some(best) = largest_face::largest(&candidates) else {
                    return Ok(None);
                };
                let seed = best.padded(self.config.seed_padding_x, self.config.seed_padding_y);
                log::debug!("face found at {best:?}, seeding tracker with {seed:?}");
                self.session = Some(self.tracker.start_track(frame, seed)?);
                // The new session reports its first position next frame.
                Ok(None)
            }
            Some(session) => {
                let quality = session.update(frame)?;
                if quality >= self.config.quality_floor {
                    Ok(Some(session.position()))
                } else {
                    log::debug!(
                        "tracking quality {quality:.2} below floor {:.2}, re-detecting",
                        self.config.quality_floor
                    );
                    self.session = None;
                    Ok(None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    // ── Test doubles ────────────────────────────────────────────────────

    /// Replays one candidate list per call; empty once the script runs out.
    struct ScriptedLocator {
        responses: VecDeque<Vec<Rect>>,
        calls: Arc<Mutex<usize>>,
    }

    impl ScriptedLocator {
        fn new(responses: Vec<Vec<Rect>>) -> Self {
            Self {
                responses: responses.into(),
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl FaceLocator for ScriptedLocator {
        fn locate(&mut self, _frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.responses.pop_front().unwrap_or_default())
        }
    }

    struct FailingLocator;

    impl FaceLocator for FailingLocator {
        fn locate(&mut self, _frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
            Err("locator error".into())
        }
    }

    /// Mints sessions that replay a scripted quality sequence. Records
    /// every seed it was given and counts dropped sessions.
    struct ScriptedTracker {
        scripts: VecDeque<VecDeque<f64>>,
        seeds: Arc<Mutex<Vec<Rect>>>,
        session_drops: Arc<Mutex<usize>>,
        position: Rect,
    }

    impl ScriptedTracker {
        fn new(scripts: Vec<Vec<f64>>) -> Self {
            Self {
                scripts: scripts.into_iter().map(Into::into).collect(),
                seeds: Arc::new(Mutex::new(Vec::new())),
                session_drops: Arc::new(Mutex::new(0)),
                position: Rect::new(40, 40, 60, 80),
            }
        }
    }

    impl Tracker for ScriptedTracker {
        fn start_track(
            &mut self,
            _frame: &Frame,
            seed: Rect,
        ) -> Result<Box<dyn TrackerSession>, Box<dyn std::error::Error>> {
            self.seeds.lock().unwrap().push(seed);
            Ok(Box::new(ScriptedSession {
                qualities: self.scripts.pop_front().unwrap_or_default(),
                drops: self.session_drops.clone(),
                position: self.position,
            }))
        }
    }

    struct ScriptedSession {
        qualities: VecDeque<f64>,
        drops: Arc<Mutex<usize>>,
        position: Rect,
    }

    impl TrackerSession for ScriptedSession {
        fn update(&mut self, _frame: &Frame) -> Result<f64, Box<dyn std::error::Error>> {
            Ok(self.qualities.pop_front().expect("quality script exhausted"))
        }

        fn position(&self) -> Rect {
            self.position
        }
    }

    impl Drop for ScriptedSession {
        fn drop(&mut self) {
            *self.drops.lock().unwrap() += 1;
        }
    }

    struct FailingSessionTracker;

    impl Tracker for FailingSessionTracker {
        fn start_track(
            &mut self,
            _frame: &Frame,
            _seed: Rect,
        ) -> Result<Box<dyn TrackerSession>, Box<dyn std::error::Error>> {
            Ok(Box::new(FailingSession))
        }
    }

    struct FailingSession;

    impl TrackerSession for FailingSession {
        fn update(&mut self, _frame: &Frame) -> Result<f64, Box<dyn std::error::Error>> {
            Err("session error".into())
        }

        fn position(&self) -> Rect {
            Rect::new(0, 0, 0, 0)
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn frame() -> Frame {
        Frame::new(vec![0u8; 8 * 8 * 3], 8, 8, 3, 0)
    }

    fn controller_with(
        locator: ScriptedLocator,
        tracker: ScriptedTracker,
    ) -> (TrackingController, Arc<Mutex<usize>>, Arc<Mutex<Vec<Rect>>>) {
        let calls = locator.calls.clone();
        let seeds = tracker.seeds.clone();
        let controller = TrackingController::new(
            Box::new(locator),
            Box::new(tracker),
            TrackingConfig::default(),
        );
        (controller, calls, seeds)
    }

    fn face(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── Searching ───────────────────────────────────────────────────────

    #[test]
    fn test_starts_in_searching() {
        let (controller, _, _) =
            controller_with(ScriptedLocator::new(vec![]), ScriptedTracker::new(vec![]));
        assert_eq!(controller.state(), TrackingState::Searching);
    }

    #[test]
    fn test_no_candidates_stays_searching() {
        let (mut controller, calls, seeds) =
            controller_with(ScriptedLocator::new(vec![]), ScriptedTracker::new(vec![]));

        for _ in 0..3 {
            assert_eq!(controller.on_frame(&frame()).unwrap(), None);
            assert_eq!(controller.state(), TrackingState::Searching);
        }
        // Locator consulted every frame, tracker never seeded.
        assert_eq!(*calls.lock().unwrap(), 3);
        assert!(seeds.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_area_candidates_do_not_seed() {
        let locator = ScriptedLocator::new(vec![vec![face(10, 10, 0, 50), face(5, 5, 20, 0)]]);
        let (mut controller, _, seeds) = controller_with(locator, ScriptedTracker::new(vec![]));

        assert_eq!(controller.on_frame(&frame()).unwrap(), None);
        assert_eq!(controller.state(), TrackingState::Searching);
        assert!(seeds.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detection_seeds_padded_rect_and_emits_nothing() {
        let locator = ScriptedLocator::new(vec![vec![face(100, 200, 50, 60)]]);
        let (mut controller, _, seeds) =
            controller_with(locator, ScriptedTracker::new(vec![vec![20.0]]));

        assert_eq!(controller.on_frame(&frame()).unwrap(), None);
        assert_eq!(controller.state(), TrackingState::Tracking);

        let seeds = seeds.lock().unwrap();
        assert_eq!(seeds.len(), 1);
        // (x-10, y-20) through (x+w+10, y+h+20)
        assert_eq!(seeds[0], Rect::new(90, 180, 70, 100));
        assert_eq!(seeds[0].right(), 160);
        assert_eq!(seeds[0].bottom(), 280);
    }

    #[test]
    fn test_seed_padding_not_clamped_at_frame_edge() {
        let locator = ScriptedLocator::new(vec![vec![face(0, 0, 30, 30)]]);
        let (mut controller, _, seeds) =
            controller_with(locator, ScriptedTracker::new(vec![vec![20.0]]));

        controller.on_frame(&frame()).unwrap();
        assert_eq!(seeds.lock().unwrap()[0], Rect::new(-10, -20, 50, 70));
    }

    #[test]
    fn test_largest_candidate_wins() {
        // Second candidate has the strictly larger area.
        let locator = ScriptedLocator::new(vec![vec![face(0, 0, 10, 10), face(5, 5, 20, 20)]]);
        let (mut controller, _, seeds) =
            controller_with(locator, ScriptedTracker::new(vec![vec![20.0]]));

        controller.on_frame(&frame()).unwrap();
        let expected = face(5, 5, 20, 20).padded(10, 20);
        assert_eq!(seeds.lock().unwrap()[0], expected);
    }

    #[test]
    fn test_custom_padding_config() {
        let locator = ScriptedLocator::new(vec![vec![face(50, 50, 40, 40)]]);
        let tracker = ScriptedTracker::new(vec![vec![20.0]]);
        let seeds = tracker.seeds.clone();
        let mut controller = TrackingController::new(
            Box::new(locator),
            Box::new(tracker),
            TrackingConfig {
                seed_padding_x: 0,
                seed_padding_y: 0,
                ..TrackingConfig::default()
            },
        );

        controller.on_frame(&frame()).unwrap();
        assert_eq!(seeds.lock().unwrap()[0], face(50, 50, 40, 40));
    }

    // ── Tracking ────────────────────────────────────────────────────────

    #[test]
    fn test_tracking_emits_position_while_quality_holds() {
        let locator = ScriptedLocator::new(vec![vec![face(30, 30, 40, 40)]]);
        let (mut controller, calls, _) =
            controller_with(locator, ScriptedTracker::new(vec![vec![15.0, 12.0, 9.0]]));

        assert_eq!(controller.on_frame(&frame()).unwrap(), None); // seeds
        for _ in 0..3 {
            let tracked = controller.on_frame(&frame()).unwrap();
            assert_eq!(tracked, Some(Rect::new(40, 40, 60, 80)));
            assert_eq!(controller.state(), TrackingState::Tracking);
        }
        // Locator ran only on the initial searching frame.
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_quality_exactly_at_floor_keeps_tracking() {
        let locator = ScriptedLocator::new(vec![vec![face(30, 30, 40, 40)]]);
        let (mut controller, _, _) =
            controller_with(locator, ScriptedTracker::new(vec![vec![8.75]]));

        controller.on_frame(&frame()).unwrap();
        let tracked = controller.on_frame(&frame()).unwrap();
        assert!(tracked.is_some());
        assert_eq!(controller.state(), TrackingState::Tracking);
    }

    #[test]
    fn test_quality_just_below_floor_drops_to_searching() {
        let locator = ScriptedLocator::new(vec![vec![face(30, 30, 40, 40)]]);
        let (mut controller, _, _) =
            controller_with(locator, ScriptedTracker::new(vec![vec![8.74]]));

        controller.on_frame(&frame()).unwrap();
        let tracked = controller.on_frame(&frame()).unwrap();
        assert_eq!(tracked, None);
        assert_eq!(controller.state(), TrackingState::Searching);
    }

    #[test]
    fn test_single_bad_frame_forces_redetection() {
        let locator = ScriptedLocator::new(vec![
            vec![face(30, 30, 40, 40)], // frame 0: first detection
            vec![],                     // frame 3: re-detection finds nothing
        ]);
        let (mut controller, calls, _) = controller_with(
            locator,
            ScriptedTracker::new(vec![vec![15.0, 3.0]]),
        );

        controller.on_frame(&frame()).unwrap(); // seed
        assert!(controller.on_frame(&frame()).unwrap().is_some()); // quality 15.0
        assert_eq!(controller.on_frame(&frame()).unwrap(), None); // quality 3.0, dropped
        assert_eq!(controller.state(), TrackingState::Searching);

        controller.on_frame(&frame()).unwrap();
        assert_eq!(*calls.lock().unwrap(), 2, "locator must run again after loss");
    }

    #[test]
    fn test_session_dropped_on_quality_loss() {
        let locator = ScriptedLocator::new(vec![vec![face(30, 30, 40, 40)]]);
        let tracker = ScriptedTracker::new(vec![vec![2.0]]);
        let drops = tracker.session_drops.clone();
        let mut controller = TrackingController::new(
            Box::new(locator),
            Box::new(tracker),
            TrackingConfig::default(),
        );

        controller.on_frame(&frame()).unwrap(); // seed
        assert_eq!(*drops.lock().unwrap(), 0);
        controller.on_frame(&frame()).unwrap(); // quality 2.0, session dropped
        assert_eq!(*drops.lock().unwrap(), 1);
    }

    #[test]
    fn test_reacquires_after_loss_with_fresh_session() {
        let locator = ScriptedLocator::new(vec![
            vec![face(30, 30, 40, 40)],
            vec![face(200, 100, 80, 80)],
        ]);
        let tracker = ScriptedTracker::new(vec![vec![2.0], vec![20.0]]);
        let seeds = tracker.seeds.clone();
        let mut controller = TrackingController::new(
            Box::new(locator),
            Box::new(tracker),
            TrackingConfig::default(),
        );

        controller.on_frame(&frame()).unwrap(); // seed #1
        controller.on_frame(&frame()).unwrap(); // lost
        controller.on_frame(&frame()).unwrap(); // seed #2
        assert_eq!(controller.state(), TrackingState::Tracking);

        let seeds = seeds.lock().unwrap();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[1], face(200, 100, 80, 80).padded(10, 20));
    }

    #[test]
    fn test_custom_quality_floor() {
        let locator = ScriptedLocator::new(vec![vec![face(30, 30, 40, 40)]]);
        let tracker = ScriptedTracker::new(vec![vec![5.0, 5.0]]);
        let mut controller = TrackingController::new(
            Box::new(locator),
            Box::new(tracker),
            TrackingConfig {
                quality_floor: 4.0,
                ..TrackingConfig::default()
            },
        );

        controller.on_frame(&frame()).unwrap();
        // 5.0 would fail the default floor of 8.75 but passes 4.0.
        assert!(controller.on_frame(&frame()).unwrap().is_some());
        assert_eq!(controller.state(), TrackingState::Tracking);
    }

    // ── Error propagation ───────────────────────────────────────────────

    #[test]
    fn test_locator_error_propagates() {
        let mut controller = TrackingController::new(
            Box::new(FailingLocator),
            Box::new(ScriptedTracker::new(vec![])),
            TrackingConfig::default(),
        );
        assert!(controller.on_frame(&frame()).is_err());
    }

    #[test]
    fn test_session_error_propagates() {
        let locator = ScriptedLocator::new(vec![vec![face(30, 30, 40, 40)]]);
        let mut controller = TrackingController::new(
            Box::new(locator),
            Box::new(FailingSessionTracker),
            TrackingConfig::default(),
        );

        controller.on_frame(&frame()).unwrap(); // seed
        assert!(controller.on_frame(&frame()).is_err());
    }
}
