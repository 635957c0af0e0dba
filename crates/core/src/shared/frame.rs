use image::imageops::FilterType;
use image::RgbImage;

/// One captured video frame: contiguous interleaved RGB bytes in row-major
/// order, plus the capture index assigned by the frame source.
///
/// Pixel format conversion happens at I/O boundaries only; everything past
/// the capture adapter works on this one representation.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

/// BT.601 luma weights, fixed-point with a 2^8 divisor.
const LUMA_R: u32 = 77;
const LUMA_G: u32 = 150;
const LUMA_B: u32 = 29;

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Grayscale copy of the frame, one byte per pixel, BT.601 weighting.
    ///
    /// The detector and the correlation tracker both operate on luma.
    pub fn to_luma(&self) -> Vec<u8> {
        debug_assert_eq!(self.channels, 3, "luma conversion expects RGB input");
        self.data
            .chunks_exact(3)
            .map(|px| {
                let y = LUMA_R * px[0] as u32 + LUMA_G * px[1] as u32 + LUMA_B * px[2] as u32;
                (y >> 8) as u8
            })
            .collect()
    }

    /// Bilinear rescale to the given dimensions, preserving the capture
    /// index. Returns a plain clone when the dimensions already match.
    pub fn resized(&self, width: u32, height: u32) -> Frame {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let img = RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("Frame data length must match dimensions");
        let scaled = image::imageops::resize(&img, width, height, FilterType::Triangle);
        Frame::new(scaled.into_raw(), width, height, 3, self.index)
    }
}
