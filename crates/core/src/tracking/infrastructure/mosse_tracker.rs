use crate::shared::frame::Frame;
use crate::shared::rect::Rect;
use crate::tracking::domain::tracker::{Tracker, TrackerSession};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;
use thiserror::Error;

/// Side length of the square correlation window, in filter pixels.
const WINDOW_SIZE: usize = 64;

/// Total pixel count of the correlation window.
const WINDOW_AREA: usize = WINDOW_SIZE * WINDOW_SIZE;

/// Blend factor for per-frame filter adaptation.
const LEARNING_RATE: f64 = 0.125;

/// Added to the filter denominator to keep the division stable.
const REGULARIZATION: f64 = 1e-5;

/// Standard deviation of the desired Gaussian response, in filter pixels.
const TARGET_SIGMA: f64 = 2.0;

/// Side length of the square around the peak excluded from the sidelobe
/// statistics when computing peak-to-sidelobe ratio.
const PSR_EXCLUSION: usize = 11;

#[derive(Debug, Error)]
pub enum MosseTrackerError {
    #[error("cannot track an empty region ({width}x{height})")]
    EmptySeed { width: i32, height: i32 },
}

/// MOSSE correlation tracker.
///
/// Each session learns an adaptive correlation filter over a fixed-size
/// luma window: crop -> log transform -> zero-mean unit-variance ->
/// Hann window -> FFT, with the filter trained to answer a narrow
/// Gaussian peak at the target centre. Update quality is the
/// peak-to-sidelobe ratio of the correlation response, which collapses
/// when the target is occluded or leaves the window. Translation only;
/// the tracked rectangle keeps its seeded size.
pub struct MosseTracker;

impl MosseTracker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MosseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker for MosseTracker {
    fn start_track(
        &mut self,
        frame: &Frame,
        seed: Rect,
    ) -> Result<Box<dyn TrackerSession>, Box<dyn std::error::Error>> {
        if seed.width <= 0 || seed.height <= 0 {
            return Err(MosseTrackerError::EmptySeed {
                width: seed.width,
                height: seed.height,
            }
            .into());
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(WINDOW_SIZE);
        let ifft = planner.plan_fft_inverse(WINDOW_SIZE);

        let mut target = gaussian_target();
        fft2(&fft, &mut target);

        let (center_x, center_y) = seed.center();
        let mut session = MosseSession {
            center_x,
            center_y,
            width: seed.width,
            height: seed.height,
            numerator: vec![Complex::new(0.0, 0.0); WINDOW_AREA],
            denominator: vec![Complex::new(0.0, 0.0); WINDOW_AREA],
            target_spectrum: target,
            hann: hann_window(),
            fft,
            ifft,
        };

        // Full-weight learning on the seed frame gives the exact
        // single-sample MOSSE filter; later frames blend in gradually.
        let spectrum = session.window_spectrum(frame);
        session.learn(&spectrum, 1.0);
        Ok(Box::new(session))
    }
}

pub struct MosseSession {
    center_x: f64,
    center_y: f64,
    width: i32,
    height: i32,
    numerator: Vec<Complex<f64>>,
    denominator: Vec<Complex<f64>>,
    target_spectrum: Vec<Complex<f64>>,
    hann: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
}

impl TrackerSession for MosseSession {
    fn update(&mut self, frame: &Frame) -> Result<f64, Box<dyn std::error::Error>> {
        let spectrum = self.window_spectrum(frame);

        // Correlate: response spectrum is F . A / (B + reg), then inverse
        // transform back to the spatial window.
        let mut response: Vec<Complex<f64>> = (0..WINDOW_AREA)
            .map(|i| spectrum[i] * self.numerator[i] / (self.denominator[i] + REGULARIZATION))
            .collect();
        ifft2(&self.ifft, &mut response);

        // Normalize IFFT (rustfft does not normalize)
        let norm = 1.0 / WINDOW_AREA as f64;
        let spatial: Vec<f64> = response.iter().map(|c| c.re * norm).collect();

        let (peak_index, peak_value) = spatial
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |(bi, bv), (i, &v)| {
                if v > bv {
                    (i, v)
                } else {
                    (bi, bv)
                }
            });
        let peak_row = peak_index / WINDOW_SIZE;
        let peak_col = peak_index % WINDOW_SIZE;

        // Displacement of the peak from the window centre, mapped back to
        // image pixels through the window's sampling scale.
        let half = (WINDOW_SIZE / 2) as f64;
        self.center_x += (peak_col as f64 - half) * self.width as f64 / WINDOW_SIZE as f64;
        self.center_y += (peak_row as f64 - half) * self.height as f64 / WINDOW_SIZE as f64;

        let quality = peak_to_sidelobe(&spatial, peak_value, peak_row, peak_col);

        // Adapt the filter from the re-centred window.
        let spectrum = self.window_spectrum(frame);
        self.learn(&spectrum, LEARNING_RATE);

        Ok(quality)
    }

    fn position(&self) -> Rect {
        // Truncating cast: the subpixel centre estimate leaves the session
        // here as integer pixel coordinates.
        Rect::new(
            (self.center_x - self.width as f64 / 2.0) as i32,
            (self.center_y - self.height as f64 / 2.0) as i32,
            self.width,
            self.height,
        )
    }
}

impl MosseSession {
    /// Crop the tracked region out of the frame's luma plane, resample it
    /// to the filter window and transform it to the frequency domain.
    /// Samples outside the frame clamp to the nearest edge pixel.
    fn window_spectrum(&self, frame: &Frame) -> Vec<Complex<f64>> {
        let luma = frame.to_luma();
        let frame_w = frame.width() as i64;
        let frame_h = frame.height() as i64;

        let left = self.center_x - self.width as f64 / 2.0;
        let top = self.center_y - self.height as f64 / 2.0;
        let step_x = self.width as f64 / WINDOW_SIZE as f64;
        let step_y = self.height as f64 / WINDOW_SIZE as f64;

        let mut window = vec![0.0f64; WINDOW_AREA];
        for row in 0..WINDOW_SIZE {
            let sample_y = top + (row as f64 + 0.5) * step_y;
            let y = (sample_y.round() as i64).clamp(0, frame_h - 1) as usize;
            for col in 0..WINDOW_SIZE {
                let sample_x = left + (col as f64 + 0.5) * step_x;
                let x = (sample_x.round() as i64).clamp(0, frame_w - 1) as usize;
                window[row * WINDOW_SIZE + col] = luma[y * frame_w as usize + x] as f64;
            }
        }

        // Log transform compresses lighting variation, then zero-mean
        // unit-variance so the filter responds to structure, not gain.
        for value in window.iter_mut() {
            *value = (*value + 1.0).ln();
        }
        let mean = window.iter().sum::<f64>() / WINDOW_AREA as f64;
        let variance =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / WINDOW_AREA as f64;
        let std_dev = variance.sqrt().max(1e-5);

        let mut spectrum: Vec<Complex<f64>> = window
            .iter()
            .zip(self.hann.iter())
            .map(|(v, h)| Complex::new((v - mean) / std_dev * h, 0.0))
            .collect();
        fft2(&self.fft, &mut spectrum);
        spectrum
    }

    /// Blend the filter numerator and denominator toward the given input
    /// spectrum. A rate of 1.0 replaces the filter outright.
    fn learn(&mut self, spectrum: &[Complex<f64>], rate: f64) {
        for i in 0..WINDOW_AREA {
            let conj = spectrum[i].conj();
            self.numerator[i] =
                self.target_spectrum[i] * conj * rate + self.numerator[i] * (1.0 - rate);
            self.denominator[i] = spectrum[i] * conj * rate + self.denominator[i] * (1.0 - rate);
        }
    }
}

/// Desired correlation response: a narrow Gaussian peak at the window
/// centre, in the spatial domain.
fn gaussian_target() -> Vec<Complex<f64>> {
    let center = (WINDOW_SIZE / 2) as f64;
    (0..WINDOW_AREA)
        .map(|i| {
            let row = (i / WINDOW_SIZE) as f64;
            let col = (i % WINDOW_SIZE) as f64;
            let distance_sq = (row - center).powi(2) + (col - center).powi(2);
            Complex::new(
                (-distance_sq / (2.0 * TARGET_SIGMA * TARGET_SIGMA)).exp(),
                0.0,
            )
        })
        .collect()
}

/// 2D Hann window as the outer product of two 1D Hann windows.
fn hann_window() -> Vec<f64> {
    let hann_1d: Vec<f64> = (0..WINDOW_SIZE)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / WINDOW_SIZE as f64).cos()))
        .collect();
    (0..WINDOW_AREA)
        .map(|i| hann_1d[i / WINDOW_SIZE] * hann_1d[i % WINDOW_SIZE])
        .collect()
}

/// Row-column 2D FFT over a square buffer, in place.
fn fft2(fft: &Arc<dyn Fft<f64>>, data: &mut [Complex<f64>]) {
    fft.process(data);
    transpose(data);
    fft.process(data);
    transpose(data);
}

fn ifft2(ifft: &Arc<dyn Fft<f64>>, data: &mut [Complex<f64>]) {
    ifft.process(data);
    transpose(data);
    ifft.process(data);
    transpose(data);
}

fn transpose(data: &mut [Complex<f64>]) {
    for row in 0..WINDOW_SIZE {
        for col in (row + 1)..WINDOW_SIZE {
            data.swap(row * WINDOW_SIZE + col, col * WINDOW_SIZE + row);
        }
    }
}

/// Peak-to-sidelobe ratio: how far the peak stands above the rest of the
/// response, excluding a small square around the peak itself.
fn peak_to_sidelobe(response: &[f64], peak_value: f64, peak_row: usize, peak_col: usize) -> f64 {
    let exclusion_half = PSR_EXCLUSION / 2;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut count = 0usize;

    for (i, &value) in response.iter().enumerate() {
        let row = i / WINDOW_SIZE;
        let col = i % WINDOW_SIZE;
        if row.abs_diff(peak_row) <= exclusion_half && col.abs_diff(peak_col) <= exclusion_half {
            continue;
        }
        sum += value;
        sum_sq += value * value;
        count += 1;
    }

    let mean = sum / count as f64;
    let variance = (sum_sq / count as f64 - mean * mean).max(0.0);
    let std_dev = variance.sqrt().max(1e-6);
    (peak_value - mean) / std_dev
}
