//! Energy flux novelty
//!
//! Lightweight alternative to spectral flux: the frame-by-frame rise of RMS
//! energy, computed directly on samples without an FFT.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Compute energy derivative (flux): E_flux[n] = max(0, E[n] - E[n-1])
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., & Sandler, M. B. (2005).
//! A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;
use crate::io::sample_buffer::SampleBuffer;

/// Energy flux novelty over overlapping frames
///
/// # Arguments
///
/// * `samples` - Mono samples
/// * `frame_size` - Frame size in samples
/// * `hop_size` - Hop between frames in samples
///
/// # Returns
///
/// One non-negative value per full frame, the first being 0
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if `frame_size` or `hop_size` is zero.
pub fn energy_flux_novelty(
    samples: &[f32],
    frame_size: usize,
    hop_size: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if frame_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size must be > 0".to_string(),
        ));
    }

    if hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    let frame_energies: Vec<f32> = SampleBuffer::new(samples, frame_size, hop_size)
        .map(|frame| {
            let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
            (sum_sq / frame.len() as f32).sqrt()
        })
        .collect();

    if frame_energies.is_empty() {
        log::warn!(
            "Frame size ({}) larger than audio length ({}), no energy frames",
            frame_size,
            samples.len()
        );
        return Ok(Vec::new());
    }

    let mut flux = Vec::with_capacity(frame_energies.len());
    flux.push(0.0);
    flux.extend(frame_energies.windows(2).map(|w| (w[1] - w[0]).max(0.0)));

    log::debug!("Energy flux novelty: {} frames", flux.len());

    Ok(flux)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_flux_step() {
        // Silence then a constant signal from sample 5000
        let mut samples = vec![0.0f32; 44100];
        for s in samples[5000..].iter_mut() {
            *s = 0.5;
        }

        let flux = energy_flux_novelty(&samples, 2048, 512).unwrap();
        let (peak_frame, _) = flux
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, &v)| if v > best.1 { (i, v) } else { best });

        // The rise happens in the frames whose window covers sample 5000
        let peak_sample = peak_frame * 512;
        assert!(
            (3000..=6000).contains(&peak_sample),
            "Rise should be near sample 5000, got frame start {}",
            peak_sample
        );
    }

    #[test]
    fn test_energy_flux_silent_audio() {
        let flux = energy_flux_novelty(&vec![0.0f32; 44100], 2048, 512).unwrap();
        assert!(flux.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_energy_flux_too_short_audio() {
        let flux = energy_flux_novelty(&vec![0.5f32; 1000], 2048, 512).unwrap();
        assert!(flux.is_empty());
    }

    #[test]
    fn test_energy_flux_invalid_parameters() {
        let samples = vec![0.5f32; 44100];
        assert!(energy_flux_novelty(&samples, 0, 512).is_err());
        assert!(energy_flux_novelty(&samples, 2048, 0).is_err());
    }
}
