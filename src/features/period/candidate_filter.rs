//! Tempo candidate merging and ranking

use super::TempoCandidate;
use std::cmp::Ordering;

/// Ranking order: score descending, then lower BPM first
pub fn rank_order(a: &TempoCandidate, b: &TempoCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.bpm.total_cmp(&b.bpm))
}

/// Merge candidates closer than `delta_bpm`
///
/// Candidates are visited in ranking order; each one is absorbed by an
/// already-kept candidate within `delta_bpm`, otherwise kept. The surviving
/// list is returned in ranking order, so within every merged cluster the
/// higher score wins.
///
/// # Arguments
///
/// * `candidates` - Candidates in any order
/// * `delta_bpm` - Merge distance in BPM (values <= 0 disable merging)
pub fn merge_close_candidates(
    mut candidates: Vec<TempoCandidate>,
    delta_bpm: f32,
) -> Vec<TempoCandidate> {
    candidates.retain(|c| c.bpm.is_finite() && c.score.is_finite());
    candidates.sort_by(rank_order);

    if delta_bpm <= 0.0 {
        return candidates;
    }

    let mut kept: Vec<TempoCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let absorbed = kept
            .iter()
            .any(|k| (k.bpm - candidate.bpm).abs() < delta_bpm);
        if absorbed {
            log::trace!(
                "Merged candidate {:.2} BPM (score {:.3})",
                candidate.bpm,
                candidate.score
            );
        } else {
            kept.push(candidate);
        }
    }

    kept
}
