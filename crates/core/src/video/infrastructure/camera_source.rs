use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraSourceError {
    #[error("failed to open camera {index}: {source}")]
    Open {
        index: u32,
        source: nokhwa::NokhwaError,
    },
    #[error("failed to start camera stream: {source}")]
    Stream { source: nokhwa::NokhwaError },
    #[error("failed to capture frame: {source}")]
    Capture { source: nokhwa::NokhwaError },
    #[error("failed to decode frame: {source}")]
    Decode { source: nokhwa::NokhwaError },
}

/// Captures live frames from a local webcam via nokhwa (native backend).
///
/// The stream is opened in the constructor at the device's highest frame
/// rate; every delivered buffer is decoded to interleaved RGB8 and stamped
/// with a monotonically increasing capture index.
pub struct NokhwaCameraSource {
    camera: Option<Camera>,
    next_index: usize,
}

impl NokhwaCameraSource {
    pub fn new(device_index: u32) -> Result<Self, CameraSourceError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(device_index), requested)
            .map_err(|source| CameraSourceError::Open {
                index: device_index,
                source,
            })?;
        camera
            .open_stream()
            .map_err(|source| CameraSourceError::Stream { source })?;
        log::info!(
            "camera {} streaming at {}",
            device_index,
            camera.resolution()
        );
        Ok(Self {
            camera: Some(camera),
            next_index: 0,
        })
    }
}

impl FrameSource for NokhwaCameraSource {
    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let camera = self.camera.as_mut().ok_or("Camera already closed")?;
        let buffer = camera
            .frame()
            .map_err(|source| CameraSourceError::Capture { source })?;
        let image = buffer
            .decode_image::<RgbFormat>()
            .map_err(|source| CameraSourceError::Decode { source })?;

        let (width, height) = (image.width(), image.height());
        let frame = Frame::new(image.into_raw(), width, height, 3, self.next_index);
        self.next_index += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("failed to stop camera stream: {e}");
            }
        }
    }
}

impl Drop for NokhwaCameraSource {
    fn drop(&mut self) {
        self.close();
    }
}
