//! Spectral flux novelty
//!
//! Sum of positive differences between successive log-compressed magnitude
//! spectra. Log compression keeps loud sustained partials from masking the
//! broadband jump of a percussive hit.
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;

/// Compression factor in `ln(1 + C * |X|)`
const LOG_COMPRESSION: f32 = 10.0;

/// Spectral flux of a magnitude spectrogram
///
/// # Arguments
///
/// * `magnitude_spec_frames` - FFT magnitude spectrogram (n_frames x n_bins)
///
/// # Returns
///
/// One non-negative novelty value per frame; the first frame has no
/// predecessor and scores 0.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if frames have inconsistent lengths.
pub fn spectral_flux_novelty(magnitude_spec_frames: &[Vec<f32>]) -> Result<Vec<f32>, AnalysisError> {
    let Some(first) = magnitude_spec_frames.first() else {
        return Ok(Vec::new());
    };

    let n_bins = first.len();
    if let Some((i, frame)) = magnitude_spec_frames
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.len() != n_bins)
    {
        return Err(AnalysisError::InvalidInput(format!(
            "Inconsistent frame lengths: frame 0 has {} bins, frame {} has {} bins",
            n_bins,
            i,
            frame.len()
        )));
    }

    let compressed: Vec<Vec<f32>> = magnitude_spec_frames
        .iter()
        .map(|frame| frame.iter().map(|&m| (1.0 + LOG_COMPRESSION * m.max(0.0)).ln()).collect())
        .collect();

    let mut flux = Vec::with_capacity(compressed.len());
    flux.push(0.0);
    for pair in compressed.windows(2) {
        let rise: f32 = pair[1]
            .iter()
            .zip(&pair[0])
            .map(|(&curr, &prev)| (curr - prev).max(0.0))
            .sum();
        flux.push(rise);
    }

    log::debug!("Spectral flux novelty: {} frames, {} bins", flux.len(), n_bins);

    Ok(flux)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rise_scores_decay_does_not() {
        let frames = vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]];
        let flux = spectral_flux_novelty(&frames).unwrap();
        assert_eq!(flux.len(), 3);
        assert_eq!(flux[0], 0.0);
        assert!(flux[1] > 0.0);
        assert_eq!(flux[2], 0.0);
    }

    #[test]
    fn test_inconsistent_frames_rejected() {
        let frames = vec![vec![0.0; 4], vec![0.0; 3]];
        assert!(spectral_flux_novelty(&frames).is_err());
    }

    #[test]
    fn test_empty_spectrogram() {
        assert!(spectral_flux_novelty(&[]).unwrap().is_empty());
    }
}
