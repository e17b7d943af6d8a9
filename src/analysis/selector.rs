//! Tempo selection with octave correction
//!
//! The strongest periodicity is often a multiple or fraction of the tempo a
//! listener would tap. Harmonically related candidates that score almost as
//! well as the top one compete, and the winner is the one closest to the
//! foot-tap range.
//!
//! # Algorithm
//!
//! 1. Reject an empty set or a top score below `min_score`
//! 2. Contenders: the top candidate plus every candidate within
//!    `octave_tolerance` of its score whose BPM ratio to it is close to a
//!    small-integer ratio `p/q` (p, q <= 5)
//! 3. Pick the contender maximizing `score * foot_tap_weight(bpm)`
//!
//! The reported confidence is the top candidate's score.

use super::metadata::AnalysisFlag;
use super::result::TempoEstimate;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::features::period::TempoCandidate;

/// Largest numerator/denominator of a harmonic ratio
const MAX_RATIO_TERM: u32 = 5;

/// Relative tolerance when matching a harmonic ratio
const RATIO_TOLERANCE: f32 = 0.02;

/// Selected tempo and the flags raised while choosing it
#[derive(Debug, Clone, PartialEq)]
pub struct TempoSelection {
    /// Chosen tempo
    pub estimate: TempoEstimate,
    /// `OctaveCorrected` and/or `MultimodalTempo`
    pub flags: Vec<AnalysisFlag>,
}

/// Perceptual weight of a tempo
///
/// Log-Gaussian centered on the geometric mean of `[min_bpm, max_bpm]`, with
/// a standard deviation of half the range in octaves. Equals 1.0 at the center.
pub fn foot_tap_weight(bpm: f32, min_bpm: f32, max_bpm: f32) -> f32 {
    if !(bpm > 0.0 && min_bpm > 0.0 && max_bpm > min_bpm) {
        return 0.0;
    }

    let center = (min_bpm * max_bpm).sqrt();
    let sigma_octaves = (max_bpm / min_bpm).log2() / 2.0;
    let distance = (bpm / center).log2() / sigma_octaves;
    (-0.5 * distance * distance).exp()
}

/// Whether `a / b` is within 2 % of some `p/q` with `p, q <= 5`
pub fn harmonically_related(a: f32, b: f32) -> bool {
    if !(a > 0.0 && b > 0.0) {
        return false;
    }

    let ratio = a / b;
    (1..=MAX_RATIO_TERM).any(|p| {
        (1..=MAX_RATIO_TERM).any(|q| {
            let target = p as f32 / q as f32;
            ((ratio - target) / target).abs() <= RATIO_TOLERANCE
        })
    })
}

/// Choose the reported tempo from ranked candidates
///
/// # Arguments
///
/// * `candidates` - Candidates sorted by score descending
/// * `config` - Selection parameters
///
/// # Errors
///
/// Returns `AnalysisError::NoDominantTempo` for an empty set or a top score
/// below `config.min_score`.
pub fn select_tempo(
    candidates: &[TempoCandidate],
    config: &AnalysisConfig,
) -> Result<TempoSelection, AnalysisError> {
    let primary = candidates
        .first()
        .ok_or_else(|| AnalysisError::NoDominantTempo("No tempo candidates".to_string()))?;

    if primary.score < config.min_score {
        return Err(AnalysisError::NoDominantTempo(format!(
            "Strongest periodicity {:.3} at {:.1} BPM is below {:.3}",
            primary.score, primary.bpm, config.min_score
        )));
    }

    let score_floor = primary.score * (1.0 - config.octave_tolerance);
    let weight = |bpm: f32| foot_tap_weight(bpm, config.foot_tap_min_bpm, config.foot_tap_max_bpm);

    let mut chosen = *primary;
    let mut best_weighted = primary.score * weight(primary.bpm);
    let mut multimodal = false;

    for candidate in candidates.iter().skip(1).filter(|c| c.score >= score_floor) {
        if !harmonically_related(candidate.bpm, primary.bpm) {
            multimodal = true;
            continue;
        }

        let weighted = candidate.score * weight(candidate.bpm);
        if weighted > best_weighted {
            best_weighted = weighted;
            chosen = *candidate;
        }
    }

    let mut flags = Vec::new();
    if chosen.bpm != primary.bpm {
        log::debug!(
            "Octave correction: {:.2} -> {:.2} BPM",
            primary.bpm,
            chosen.bpm
        );
        flags.push(AnalysisFlag::OctaveCorrected);
    }
    if multimodal {
        log::debug!("Unrelated tempo peaks within tolerance of {:.2} BPM", primary.bpm);
        flags.push(AnalysisFlag::MultimodalTempo);
    }

    Ok(TempoSelection {
        estimate: TempoEstimate {
            bpm: chosen.bpm,
            confidence: primary.score,
        },
        flags,
    })
}
