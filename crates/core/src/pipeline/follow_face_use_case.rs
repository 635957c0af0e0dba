use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::{PROCESSING_HEIGHT, PROCESSING_WIDTH};
use crate::steering::directive::classify;
use crate::tracking::domain::tracking_controller::TrackingController;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::renderer::Renderer;

/// Pipeline dimensions every captured frame is rescaled to before
/// detection and tracking.
#[derive(Clone, Copy, Debug)]
pub struct FollowConfig {
    pub processing_width: u32,
    pub processing_height: u32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            processing_width: PROCESSING_WIDTH,
            processing_height: PROCESSING_HEIGHT,
        }
    }
}

/// Orchestrates the live follow loop: capture, rescale, track, classify,
/// present, until the operator quits or the process is interrupted.
///
/// This is a single-use struct: `execute` consumes the owned source and
/// renderer, so calling it twice will fail. Whatever way the loop ends,
/// both are closed and the logger summary is emitted before `execute`
/// returns.
pub struct FollowFaceUseCase {
    source: Option<Box<dyn FrameSource>>,
    renderer: Option<Box<dyn Renderer>>,
    controller: TrackingController,
    config: FollowConfig,
    cancelled: Arc<AtomicBool>,
}

impl FollowFaceUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        renderer: Box<dyn Renderer>,
        controller: TrackingController,
        config: FollowConfig,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source: Some(source),
            renderer: Some(renderer),
            controller,
            config,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(
        &mut self,
        logger: &mut dyn PipelineLogger,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut source = self.source.take().ok_or("Pipeline already executed")?;
        let mut renderer = self.renderer.take().ok_or("Pipeline already executed")?;

        let result = self.run_loop(source.as_mut(), renderer.as_mut(), logger);

        // Single teardown funnel: every exit path releases the capture
        // device and the window, then reports.
        source.close();
        renderer.close();
        logger.summary();
        result
    }

    fn run_loop(
        &mut self,
        source: &mut dyn FrameSource,
        renderer: &mut dyn Renderer,
        logger: &mut dyn PipelineLogger,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut frames = 0usize;
        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                logger.info("Interrupted, shutting down");
                return Ok(());
            }
            if renderer.quit_requested() {
                logger.info("Quit requested, shutting down");
                return Ok(());
            }

            let capture_start = Instant::now();
            let captured = source.next_frame()?;
            logger.timing("capture", capture_start.elapsed().as_secs_f64() * 1000.0);

            let frame = captured.resized(self.config.processing_width, self.config.processing_height);

            let track_start = Instant::now();
            let target = self.controller.on_frame(&frame)?;
            logger.timing("track", track_start.elapsed().as_secs_f64() * 1000.0);

            let directive = target.map(|rect| classify(rect, frame.width(), frame.height()));

            let render_start = Instant::now();
            renderer.present(&frame, target, directive)?;
            logger.timing("render", render_start.elapsed().as_secs_f64() * 1000.0);

            logger.metric("target_visible", if target.is_some() { 1.0 } else { 0.0 });
            frames += 1;
            logger.progress(frames);
        }
    }
}
