//! Autocorrelation of the onset envelope
//!
//! Finds periodicity in the envelope using FFT-accelerated autocorrelation.
//!
//! # Algorithm
//!
//! 1. Remove the envelope mean so a constant novelty floor does not correlate
//! 2. Compute `ACF = IFFT(|FFT(signal)|²)` on a zero-padded buffer (no wrap-around)
//! 3. Apply the unbiased correction `n / (n - lag)` so long lags are not
//!    penalized for having fewer overlapping frames
//! 4. Normalize by `ACF[0]` and clamp to [0, 1]
//!
//! # Reference
//!
//! Ellis, D. P. W., & Pikrakis, A. (2006). Real-time Beat Induction.
//! *Proceedings of the International Conference on Music Information Retrieval*.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

const EPSILON: f32 = 1e-10;

/// Normalized autocorrelation of a novelty signal
///
/// # Returns
///
/// `acf[lag]` for `lag` in `0..signal.len()`, with `acf[0] == 1.0` and all
/// values in [0, 1]. A constant or empty signal has no periodic structure and
/// yields all zeros.
pub fn normalized_autocorrelation(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let mean = signal.iter().sum::<f32>() / n as f32;

    // FFT size: next power of 2 >= 2*n (for zero-padding)
    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x - mean, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    // |FFT|²
    for x in &mut buffer {
        *x = Complex::new(x.norm_sqr(), 0.0);
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_size as f32;
    let zero_lag = buffer[0].re * scale;
    if zero_lag <= EPSILON {
        log::debug!("Envelope has no variance, autocorrelation is empty");
        return vec![0.0; n];
    }

    buffer[..n]
        .iter()
        .enumerate()
        .map(|(lag, x)| {
            let unbiased = x.re * scale * n as f32 / (n - lag) as f32;
            (unbiased / zero_lag).clamp(0.0, 1.0)
        })
        .collect()
}

/// Linearly interpolated ACF value at a fractional lag (0 outside the range)
pub fn acf_at(acf: &[f32], lag: f32) -> f32 {
    if lag < 0.0 || acf.is_empty() {
        return 0.0;
    }

    let idx = lag.floor() as usize;
    let frac = lag - idx as f32;
    match (acf.get(idx), acf.get(idx + 1)) {
        (Some(&a), Some(&b)) => a + (b - a) * frac,
        (Some(&a), None) if frac <= EPSILON => a,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_lag_is_one() {
        let signal = vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let acf = normalized_autocorrelation(&signal);
        assert_eq!(acf.len(), signal.len());
        assert!((acf[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_period_three_peaks_at_lag_three() {
        let signal: Vec<f32> = (0..60).map(|i| if i % 3 == 0 { 1.0 } else { 0.0 }).collect();
        let acf = normalized_autocorrelation(&signal);
        assert!(acf[3] > 0.9, "acf[3] = {}", acf[3]);
        assert!(acf[6] > 0.9, "acf[6] = {}", acf[6]);
        assert!(acf[1] < 0.05, "acf[1] = {}", acf[1]);
        assert!(acf[2] < 0.05, "acf[2] = {}", acf[2]);
    }

    #[test]
    fn test_constant_signal_has_no_periodicity() {
        let acf = normalized_autocorrelation(&[0.5; 32]);
        assert!(acf.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_acf_at_interpolates() {
        let acf = vec![1.0, 0.0, 0.5];
        assert!((acf_at(&acf, 1.5) - 0.25).abs() < 1e-6);
        assert_eq!(acf_at(&acf, 2.0), 0.5);
        assert_eq!(acf_at(&acf, 2.5), 0.0);
        assert_eq!(acf_at(&acf, -1.0), 0.0);
    }
}
