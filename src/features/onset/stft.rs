//! Short-time Fourier transform for onset analysis
//!
//! Hann-windowed magnitude spectrogram computed with `rustfft`. One FFT plan
//! is built per call and reused across frames.

use crate::io::sample_buffer::SampleBuffer;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Periodic Hann window of length `n`
pub fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos()))
        .collect()
}

/// Compute the magnitude spectrogram
///
/// # Arguments
///
/// * `samples` - Mono samples (at least `frame_size` long)
/// * `frame_size` - FFT size in samples
/// * `hop_size` - Hop between frames in samples
///
/// # Returns
///
/// One magnitude spectrum (`frame_size / 2 + 1` bins) per full frame
pub fn magnitude_spectrogram(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    let frames = SampleBuffer::new(samples, frame_size, hop_size);
    let n_frames = frames.frame_count();
    let n_bins = frame_size / 2 + 1;

    log::debug!(
        "Computing STFT: {} frames of {} samples, hop {}",
        n_frames,
        frame_size,
        hop_size
    );

    let window = hann_window(frame_size);
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_size);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); frame_size];

    let mut spectrogram = Vec::with_capacity(n_frames);
    for frame in frames {
        for ((slot, &x), &w) in buffer.iter_mut().zip(frame).zip(&window) {
            *slot = Complex::new(x * w, 0.0);
        }
        fft.process(&mut buffer);
        spectrogram.push(buffer[..n_bins].iter().map(|c| c.norm()).collect());
    }

    spectrogram
}
