//! Silence detection and trimming utilities

use crate::error::AnalysisError;

/// Silence detection configuration
#[derive(Debug, Clone)]
pub struct SilenceDetector {
    /// Threshold in dBFS (default: -60.0)
    pub threshold_db: f32,

    /// Frame size for RMS analysis (default: 1024)
    pub frame_size: usize,
}

impl Default for SilenceDetector {
    fn default() -> Self {
        Self {
            threshold_db: -60.0,
            frame_size: 1024,
        }
    }
}

/// Convert a dBFS value to linear amplitude
pub(crate) fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Peak absolute amplitude of a buffer
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// True when no sample reaches the threshold (all-zero buffers included)
pub fn is_silent(samples: &[f32], threshold_db: f32) -> bool {
    let peak = peak_amplitude(samples);
    peak <= 0.0 || peak < db_to_linear(threshold_db)
}

/// Trim leading and trailing silence
///
/// Frames whose RMS falls below the threshold are dropped from both ends only;
/// silent gaps between sounding frames are kept because they carry rhythm.
///
/// # Returns
///
/// Trimmed samples and the `(start, end)` sample range that was kept
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` is zero.
pub fn detect_and_trim(
    samples: &[f32],
    detector: &SilenceDetector,
) -> Result<(Vec<f32>, (usize, usize)), AnalysisError> {
    if detector.frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Silence frame size must be > 0".to_string(),
        ));
    }

    if samples.is_empty() {
        return Ok((Vec::new(), (0, 0)));
    }

    let threshold = db_to_linear(detector.threshold_db);
    let frame_rms = |chunk: &[f32]| -> f32 {
        let sum_sq: f32 = chunk.iter().map(|&x| x * x).sum();
        (sum_sq / chunk.len() as f32).sqrt()
    };

    let frames: Vec<&[f32]> = samples.chunks(detector.frame_size).collect();
    let first = frames.iter().position(|chunk| frame_rms(chunk) >= threshold);
    let last = frames.iter().rposition(|chunk| frame_rms(chunk) >= threshold);

    let (start, end) = match (first, last) {
        (Some(first), Some(last)) => (
            first * detector.frame_size,
            ((last + 1) * detector.frame_size).min(samples.len()),
        ),
        _ => {
            log::debug!("No frame above {:.1} dB, nothing kept", detector.threshold_db);
            return Ok((Vec::new(), (0, 0)));
        }
    };

    log::debug!(
        "Silence trim kept samples {}..{} of {}",
        start,
        end,
        samples.len()
    );

    Ok((samples[start..end].to_vec(), (start, end)))
}
