//! Peak normalization
//!
//! Scales the analysis signal so its loudest sample sits at a fixed peak.
//! Downstream thresholds (silence trim, onset novelty) are then relative to
//! the track's own level rather than its mastering gain.

use crate::error::AnalysisError;

/// Numerical stability epsilon for divisions
const EPSILON: f32 = 1e-10;

/// Level measurements taken during normalization
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMetadata {
    /// Peak level in dBFS before normalization
    pub peak_db: f32,
    /// RMS level in dBFS before normalization
    pub rms_db: f32,
    /// Gain applied in dB
    pub gain_db: f32,
}

fn to_db(linear: f32) -> f32 {
    if linear > EPSILON {
        20.0 * linear.log10()
    } else {
        f32::NEG_INFINITY
    }
}

/// Normalize samples in place so the absolute peak equals `target_peak`
///
/// A buffer with no energy is left untouched and reported with zero gain.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `target_peak` is not in (0, 1].
pub fn normalize_peak(samples: &mut [f32], target_peak: f32) -> Result<LevelMetadata, AnalysisError> {
    if !(target_peak > 0.0 && target_peak <= 1.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Target peak must be in (0, 1], got {}",
            target_peak
        )));
    }

    if samples.is_empty() {
        return Ok(LevelMetadata {
            peak_db: f32::NEG_INFINITY,
            rms_db: f32::NEG_INFINITY,
            gain_db: 0.0,
        });
    }

    let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let sum_sq: f64 = samples.iter().map(|&x| (x as f64) * (x as f64)).sum();
    let rms = (sum_sq / samples.len() as f64).sqrt() as f32;

    if peak <= EPSILON {
        log::debug!("Peak normalization skipped: signal has no energy");
        return Ok(LevelMetadata {
            peak_db: to_db(peak),
            rms_db: to_db(rms),
            gain_db: 0.0,
        });
    }

    let gain = target_peak / peak;
    for s in samples.iter_mut() {
        *s *= gain;
    }

    let metadata = LevelMetadata {
        peak_db: to_db(peak),
        rms_db: to_db(rms),
        gain_db: to_db(gain),
    };

    log::debug!(
        "Peak normalization: peak={:.1} dB, rms={:.1} dB, gain={:+.1} dB",
        metadata.peak_db,
        metadata.rms_db,
        metadata.gain_db
    );

    Ok(metadata)
}
