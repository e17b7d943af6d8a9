//! Harmonic comb scoring of candidate tempos
//!
//! Tests hypothesis tempos against the envelope autocorrelation.
//!
//! # Algorithm
//!
//! For each candidate BPM on a regular grid:
//! 1. Convert to a fractional lag: `lag = frame_rate * 60 / bpm`
//! 2. Read the normalized ACF at `lag, 2*lag, ..., K*lag` (linear interpolation),
//!    keeping only multiples up to half the envelope length
//! 3. Score = mean of those readings, so it stays in [0, 1]
//!
//! Summing period multiples sharpens the peak (the error of `K*lag` is K
//! times smaller in relative terms) and lets a true beat period outscore a
//! lag that only lines up with every other beat.
//!
//! # Reference
//!
//! Gkiokas, A., Katsouros, V., & Carayannis, G. (2012).
//! Dimensionality Reduction for BPM Estimation.
//! *IEEE Transactions on Audio, Speech, and Language Processing*, 20(3), 865-876.

use super::autocorrelation::acf_at;
use crate::error::AnalysisError;
use rayon::prelude::*;

const EPSILON: f32 = 1e-6;

/// Tempo grid parameters
#[derive(Debug, Clone, Copy)]
pub struct TempoGrid {
    /// Lowest BPM on the grid
    pub min_bpm: f32,
    /// Highest BPM on the grid
    pub max_bpm: f32,
    /// Grid step in BPM
    pub resolution: f32,
    /// Number of period multiples read per candidate
    pub max_harmonics: usize,
}

impl TempoGrid {
    /// Number of grid points (both ends included)
    pub fn len(&self) -> usize {
        ((self.max_bpm - self.min_bpm) / self.resolution + EPSILON).floor() as usize + 1
    }

    /// Whether the grid has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// BPM of grid point `i`
    pub fn bpm_at(&self, i: usize) -> f32 {
        self.min_bpm + i as f32 * self.resolution
    }
}

/// Score every candidate tempo on the grid
///
/// Candidates whose fundamental lag exceeds half the envelope are skipped:
/// the envelope is too short to observe that period repeating.
///
/// # Arguments
///
/// * `acf` - Normalized autocorrelation of the envelope (see [`super::autocorrelation`])
/// * `frame_rate` - Envelope frames per second
/// * `grid` - Tempo grid to evaluate
///
/// # Returns
///
/// `(bpm, score)` pairs in ascending BPM order, scores in [0, 1]
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a non-positive frame rate or an
/// invalid grid.
pub fn score_tempo_grid(
    acf: &[f32],
    frame_rate: f32,
    grid: &TempoGrid,
) -> Result<Vec<(f32, f32)>, AnalysisError> {
    if !(frame_rate > 0.0) {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid envelope frame rate: {}",
            frame_rate
        )));
    }

    if !(grid.min_bpm > 0.0 && grid.max_bpm > grid.min_bpm && grid.resolution > 0.0)
        || grid.max_harmonics == 0
    {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid tempo grid: [{:.1}, {:.1}] step {:.2}, {} harmonics",
            grid.min_bpm, grid.max_bpm, grid.resolution, grid.max_harmonics
        )));
    }

    let max_lag = acf.len() as f32 / 2.0;

    log::debug!(
        "Scoring {} tempo candidates over [{:.1}, {:.1}] BPM (max lag {:.1} frames)",
        grid.len(),
        grid.min_bpm,
        grid.max_bpm,
        max_lag
    );

    // Collect preserves grid order, so the result matches a sequential scan
    let scores: Vec<(f32, f32)> = (0..grid.len())
        .into_par_iter()
        .filter_map(|i| {
            let bpm = grid.bpm_at(i);
            let lag = frame_rate * 60.0 / bpm;
            harmonic_score(acf, lag, max_lag, grid.max_harmonics).map(|score| (bpm, score))
        })
        .collect();

    if scores.is_empty() {
        log::warn!(
            "Envelope of {} frames too short for any tempo in [{:.1}, {:.1}] BPM",
            acf.len(),
            grid.min_bpm,
            grid.max_bpm
        );
    }

    Ok(scores)
}

/// Mean ACF over the period multiples of `lag` that fit below `max_lag`
fn harmonic_score(acf: &[f32], lag: f32, max_lag: f32, max_harmonics: usize) -> Option<f32> {
    let readings: Vec<f32> = (1..=max_harmonics)
        .map(|k| k as f32 * lag)
        .take_while(|&l| l <= max_lag)
        .map(|l| acf_at(acf, l))
        .collect();

    if readings.is_empty() {
        return None;
    }

    Some((readings.iter().sum::<f32>() / readings.len() as f32).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::super::autocorrelation::normalized_autocorrelation;
    use super::*;

    fn pulse_train(period_frames: usize, n: usize) -> Vec<f32> {
        (0..n).map(|i| if i % period_frames == 0 { 1.0 } else { 0.0 }).collect()
    }

    fn grid() -> TempoGrid {
        TempoGrid {
            min_bpm: 40.0,
            max_bpm: 208.0,
            resolution: 0.5,
            max_harmonics: 4,
        }
    }

    #[test]
    fn test_grid_includes_both_ends() {
        let g = grid();
        assert_eq!(g.len(), 337);
        assert_eq!(g.bpm_at(0), 40.0);
        assert_eq!(g.bpm_at(g.len() - 1), 208.0);
    }

    #[test]
    fn test_pulse_train_scores_highest_at_its_tempo() {
        // 50 frames per beat at 100 frames/s = 120 BPM
        let acf = normalized_autocorrelation(&pulse_train(50, 2000));
        let scores = score_tempo_grid(&acf, 100.0, &grid()).unwrap();

        let score_of = |bpm: f32| {
            scores
                .iter()
                .find(|(b, _)| (*b - bpm).abs() < 1e-3)
                .map(|(_, s)| *s)
                .unwrap()
        };

        assert!(score_of(120.0) > 0.9);
        assert!(score_of(60.0) > 0.9, "sub-harmonic keeps full support");
        assert!(score_of(90.0) < 0.5);
        assert!(score_of(150.0) < 0.1);
    }

    #[test]
    fn test_short_envelope_skips_slow_tempos() {
        // 100 frames at 100 frames/s: max lag 50 frames = 120 BPM
        let acf = normalized_autocorrelation(&pulse_train(25, 100));
        let scores = score_tempo_grid(&acf, 100.0, &grid()).unwrap();
        assert!(scores.iter().all(|(bpm, _)| *bpm >= 120.0));
        assert!(!scores.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let acf = vec![1.0, 0.5];
        assert!(score_tempo_grid(&acf, 0.0, &grid()).is_err());
        let bad = TempoGrid {
            min_bpm: 100.0,
            max_bpm: 50.0,
            ..grid()
        };
        assert!(score_tempo_grid(&acf, 100.0, &bad).is_err());
    }
}
