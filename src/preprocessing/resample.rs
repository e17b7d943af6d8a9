//! Sample-rate conversion to the fixed analysis rate
//!
//! Uses a band-limited sinc resampler (`rubato::SincFixedIn`). Quality is
//! bounded for rhythm analysis: onset envelopes only need the spectrum below
//! a few kHz, so a short sinc kernel keeps full-track conversion cheap.

use crate::error::AnalysisError;
use rubato::{
    calculate_cutoff, Resampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

/// Input block size fed to the resampler
const CHUNK_SIZE: usize = 1024;

/// Sinc kernel length (taps per side of the interpolation)
const SINC_LEN: usize = 64;

/// Resample mono audio from `src_rate` to `dst_rate`
///
/// The resampler's group delay is compensated, so the output is time-aligned
/// with the input and has `round(len * dst_rate / src_rate)` samples.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for zero rates and
/// `AnalysisError::ProcessingError` if the resampler fails.
pub fn resample_mono(
    samples: &[f32],
    src_rate: u32,
    dst_rate: u32,
) -> Result<Vec<f32>, AnalysisError> {
    if src_rate == 0 || dst_rate == 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid resampling rates: {} -> {}",
            src_rate, dst_rate
        )));
    }

    if src_rate == dst_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = dst_rate as f64 / src_rate as f64;
    let expected_len = (samples.len() as f64 * ratio).round() as usize;

    log::debug!(
        "Resampling {} samples {} Hz -> {} Hz (ratio {:.4})",
        samples.len(),
        src_rate,
        dst_rate,
        ratio
    );

    let window = WindowFunction::BlackmanHarris2;
    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: calculate_cutoff(SINC_LEN, window),
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window,
    };

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
        .map_err(|e| AnalysisError::ProcessingError(format!("Resampler setup failed: {}", e)))?;

    let delay = resampler.output_delay();
    let wanted = delay + expected_len;
    let mut out: Vec<f32> = Vec::with_capacity(wanted + CHUNK_SIZE);

    let mut chunks = samples.chunks_exact(CHUNK_SIZE);
    for chunk in &mut chunks {
        let block = resampler
            .process(&[chunk][..], None)
            .map_err(|e| AnalysisError::ProcessingError(format!("Resampling failed: {}", e)))?;
        out.extend_from_slice(&block[0]);
    }

    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let input: [&[f32]; 1] = [remainder];
        let block = resampler
            .process_partial(Some(&input[..]), None)
            .map_err(|e| AnalysisError::ProcessingError(format!("Resampling failed: {}", e)))?;
        out.extend_from_slice(&block[0]);
    }

    // Flush the filter tail until the delayed signal is fully out
    while out.len() < wanted {
        let block = resampler
            .process_partial::<&[f32]>(None, None)
            .map_err(|e| AnalysisError::ProcessingError(format!("Resampling flush failed: {}", e)))?;
        if block[0].is_empty() {
            break;
        }
        out.extend_from_slice(&block[0]);
    }

    let end = wanted.min(out.len());
    let start = delay.min(end);
    Ok(out[start..end].to_vec())
}
