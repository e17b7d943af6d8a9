//! Channel mixing utilities (interleaved multi-channel to mono)

use crate::error::AnalysisError;

/// Downmix interleaved audio to mono by averaging channels
///
/// # Arguments
///
/// * `interleaved` - Interleaved samples (`[L0, R0, L1, R1, ...]` for stereo)
/// * `channels` - Number of interleaved channels (>= 1)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `channels` is zero or the buffer
/// length is not a whole number of frames.
pub fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, AnalysisError> {
    if channels == 0 {
        return Err(AnalysisError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if interleaved.len() % channels != 0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Buffer of {} samples is not a whole number of {}-channel frames",
            interleaved.len(),
            channels
        )));
    }

    if channels == 1 {
        return Ok(interleaved.to_vec());
    }

    log::debug!(
        "Downmixing {} frames of {}-channel audio to mono",
        interleaved.len() / channels,
        channels
    );

    let scale = 1.0 / channels as f32;
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect())
}
