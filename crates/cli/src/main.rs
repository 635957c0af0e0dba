use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use facesteer_core::detection::domain::face_locator::FaceLocator;
use facesteer_core::detection::infrastructure::model_resolver;
use facesteer_core::detection::infrastructure::seeta_face_locator::SeetaFaceLocator;
use facesteer_core::pipeline::follow_face_use_case::{FollowConfig, FollowFaceUseCase};
use facesteer_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facesteer_core::shared::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, SEETA_MODEL_NAME, SEETA_MODEL_URL,
};
use facesteer_core::tracking::domain::tracking_controller::{TrackingConfig, TrackingController};
use facesteer_core::tracking::infrastructure::mosse_tracker::MosseTracker;
use facesteer_core::video::infrastructure::camera_source::NokhwaCameraSource;
use facesteer_core::video::infrastructure::window_renderer::MinifbWindowRenderer;

const CAMERA_INDEX: u32 = 0;
const WINDOW_TITLE: &str = "facesteer";

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cancelled = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&cancelled);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed))?;

    let locator = build_locator()?;
    let controller = TrackingController::new(
        locator,
        Box::new(MosseTracker::new()),
        TrackingConfig::default(),
    );

    let source = Box::new(NokhwaCameraSource::new(CAMERA_INDEX)?);
    let renderer = Box::new(MinifbWindowRenderer::new(
        WINDOW_TITLE,
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
    )?);

    let mut use_case = FollowFaceUseCase::new(
        source,
        renderer,
        controller,
        FollowConfig::default(),
        Some(cancelled),
    );
    let mut logger = StdoutPipelineLogger::default();
    use_case.execute(&mut logger)
}

fn build_locator() -> Result<Box<dyn FaceLocator>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {SEETA_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        SEETA_MODEL_NAME,
        SEETA_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    Ok(Box::new(SeetaFaceLocator::new(&model_path)?))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let percent = downloaded * 100 / total;
        eprint!("\rDownloading face detection model... {percent}%");
    } else {
        let mib = downloaded as f64 / (1024.0 * 1024.0);
        eprint!("\rDownloading face detection model... {mib:.1} MiB");
    }
}
