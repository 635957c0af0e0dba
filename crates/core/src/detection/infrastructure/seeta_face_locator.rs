use std::path::Path;

use rustface::ImageData;
use thiserror::Error;

use crate::detection::domain::face_locator::FaceLocator;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Smallest face the detector will report, in pixels. The SeetaFace
/// scanning window is 40px, so anything below that is upscaled noise.
const MIN_FACE_SIZE: u32 = 40;

/// Classifier score cutoff. Higher trades recall for precision.
const SCORE_THRESH: f64 = 2.0;

/// Image pyramid downscale step between detection passes.
const PYRAMID_SCALE_FACTOR: f32 = 0.8;

/// Sliding window stride in pixels, horizontal and vertical.
const SLIDE_WINDOW_STEP: u32 = 4;

#[derive(Error, Debug)]
pub enum SeetaLocatorError {
    #[error("failed to load detector model from {path}: {message}")]
    Model { path: String, message: String },
}

/// Frontal-face locator backed by the SeetaFace detection engine.
///
/// Detection runs on a grayscale copy of the frame. Reported boxes are
/// converted to [`Rect`] with explicit truncating casts; this is the only
/// place detector geometry crosses into domain coordinates.
pub struct SeetaFaceLocator {
    detector: Box<dyn rustface::Detector>,
}

impl SeetaFaceLocator {
    pub fn new(model_path: &Path) -> Result<Self, SeetaLocatorError> {
        let path = model_path.to_string_lossy().into_owned();
        let mut detector =
            rustface::create_detector(&path).map_err(|e| SeetaLocatorError::Model {
                path: path.clone(),
                message: e.to_string(),
            })?;
        detector.set_min_face_size(MIN_FACE_SIZE);
        detector.set_score_thresh(SCORE_THRESH);
        detector.set_pyramid_scale_factor(PYRAMID_SCALE_FACTOR);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);
        Ok(Self { detector })
    }
}

impl FaceLocator for SeetaFaceLocator {
    fn locate(&mut self, frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        let luma = frame.to_luma();
        let mut image = ImageData::new(&luma, frame.width(), frame.height());
        let faces = self.detector.detect(&mut image);

        let rects = faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Rect::new(
                    bbox.x(),
                    bbox.y(),
                    bbox.width() as i32,
                    bbox.height() as i32,
                )
            })
            .collect();
        Ok(rects)
    }
}
