//! Period estimation modules
//!
//! Convert the onset envelope to ranked tempo candidates using:
//! - Autocorrelation of the envelope
//! - Harmonic comb scoring over a BPM grid
//! - Peak picking, parabolic refinement and candidate merging

pub mod autocorrelation;
pub mod candidate_filter;
pub mod comb_filter;
pub mod peak_picking;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::onset::OnsetEnvelope;
use serde::{Deserialize, Serialize};

use autocorrelation::normalized_autocorrelation;
use candidate_filter::merge_close_candidates;
use comb_filter::{score_tempo_grid, TempoGrid};
use peak_picking::{find_peaks, refine_peak};

/// Tempo hypothesis with its periodicity score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoCandidate {
    /// Tempo in beats per minute
    pub bpm: f32,

    /// Periodicity score (0.0-1.0)
    pub score: f32,
}

/// Estimate tempo candidates from an onset envelope
///
/// # Algorithm
///
/// 1. Normalized autocorrelation of the envelope
/// 2. Harmonic comb score for every BPM on the configured grid
/// 3. Local maxima of the score curve, refined by parabolic interpolation
/// 4. Candidates within `merge_delta_bpm` merged, higher score kept
///
/// # Returns
///
/// Candidates sorted by score descending (ties: lower BPM first). An envelope
/// too short to observe any period in range yields an empty list.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an invalid grid configuration.
pub fn estimate_periodicity(
    envelope: &OnsetEnvelope,
    config: &AnalysisConfig,
) -> Result<Vec<TempoCandidate>, AnalysisError> {
    if envelope.is_empty() {
        log::warn!("Empty onset envelope, no tempo candidates");
        return Ok(Vec::new());
    }

    let acf = normalized_autocorrelation(envelope.values());
    let grid = TempoGrid {
        min_bpm: config.min_bpm,
        max_bpm: config.max_bpm,
        resolution: config.bpm_resolution,
        max_harmonics: config.max_harmonics,
    };

    let scored = score_tempo_grid(&acf, envelope.frame_rate(), &grid)?;
    if scored.is_empty() {
        return Ok(Vec::new());
    }

    let scores: Vec<f32> = scored.iter().map(|&(_, s)| s).collect();
    let step = config.bpm_resolution;

    let candidates: Vec<TempoCandidate> = find_peaks(&scores, 0.0, 1)
        .into_iter()
        .map(|(idx, _)| {
            let (offset, value) = refine_peak(&scores, idx);
            TempoCandidate {
                bpm: (scored[idx].0 + offset * step).clamp(config.min_bpm, config.max_bpm),
                score: value.clamp(0.0, 1.0),
            }
        })
        .collect();

    let merged = merge_close_candidates(candidates, config.merge_delta_bpm);

    if let Some(top) = merged.first() {
        log::debug!(
            "{} tempo candidates, top {:.2} BPM (score {:.3})",
            merged.len(),
            top.bpm,
            top.score
        );
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Envelope rate where 120 BPM is exactly 50 frames per beat
    const HOP_SECONDS: f32 = 0.01;

    /// Impulse every `period_frames` frames
    fn pulse_envelope(period_frames: usize, len: usize) -> OnsetEnvelope {
        let values: Vec<f32> = (0..len)
            .map(|i| if i % period_frames == 0 { 1.0 } else { 0.0 })
            .collect();
        OnsetEnvelope::new(values, HOP_SECONDS).unwrap()
    }

    #[test]
    fn test_120_bpm_pulse_train() {
        let config = AnalysisConfig::default();
        let envelope = pulse_envelope(50, 3000);

        let candidates = estimate_periodicity(&envelope, &config).unwrap();
        assert!(!candidates.is_empty());
        assert!(candidates.iter().any(|c| (c.bpm - 120.0).abs() < 1.0 && c.score > 0.8));

        // Ranked
        for pair in candidates.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_jittered_pulse_train_still_ranks_beat_first() {
        // 43.07 frames per beat at the default analysis rate, rounded to whole frames
        let config = AnalysisConfig::default();
        let period = 0.5 / config.hop_seconds();
        let mut values = vec![0.0f32; 4000];
        let mut t = 0.0f32;
        while (t.round() as usize) < values.len() {
            values[t.round() as usize] = 1.0;
            t += period;
        }
        let envelope = OnsetEnvelope::new(values, config.hop_seconds()).unwrap();

        let candidates = estimate_periodicity(&envelope, &config).unwrap();
        let top = candidates[0];
        assert!((top.bpm - 120.0).abs() < 2.0, "top candidate {:.2} BPM", top.bpm);
    }

    #[test]
    fn test_candidates_are_separated() {
        let config = AnalysisConfig::default();
        // 100 BPM
        let envelope = pulse_envelope(60, 3000);

        let candidates = estimate_periodicity(&envelope, &config).unwrap();
        assert!(!candidates.is_empty());
        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                assert!((a.bpm - b.bpm).abs() >= config.merge_delta_bpm);
            }
            assert!(a.bpm >= config.min_bpm && a.bpm <= config.max_bpm);
        }
    }

    #[test]
    fn test_short_envelope_yields_nothing() {
        let config = AnalysisConfig::default();
        let envelope = OnsetEnvelope::new(vec![0.0, 1.0, 0.0, 1.0], config.hop_seconds()).unwrap();
        assert!(estimate_periodicity(&envelope, &config).unwrap().is_empty());
    }
}
