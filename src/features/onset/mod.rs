//! Onset envelope extraction
//!
//! Converts an [`AudioSignal`] into a lower-rate novelty sequence that
//! captures rhythmic energy changes:
//! - STFT framing with a Hann window
//! - Spectral flux (default) or energy flux novelty per frame
//! - Moving-average smoothing and normalization to [0, 1]

pub mod energy_flux;
pub mod smoothing;
pub mod spectral_flux;
pub mod stft;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::preprocessing::AudioSignal;
use serde::{Deserialize, Serialize};

/// Novelty function used to build the onset envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnsetMethod {
    /// Positive differences of log-compressed magnitude spectra
    SpectralFlux,
    /// Positive differences of frame RMS energy (no FFT)
    EnergyFlux,
}

impl OnsetMethod {
    /// Short identifier used in result metadata
    pub fn name(&self) -> &'static str {
        match self {
            OnsetMethod::SpectralFlux => "spectral_flux",
            OnsetMethod::EnergyFlux => "energy_flux",
        }
    }
}

/// Novelty values at a fixed frame hop
///
/// Invariants: non-empty, values in [0, 1], one hop duration per run.
#[derive(Debug, Clone)]
pub struct OnsetEnvelope {
    values: Vec<f32>,
    hop_seconds: f32,
}

impl OnsetEnvelope {
    /// Build an envelope from raw values
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `values` is empty, contains
    /// negative or non-finite values, or `hop_seconds` is not positive.
    pub fn new(values: Vec<f32>, hop_seconds: f32) -> Result<Self, AnalysisError> {
        if values.is_empty() {
            return Err(AnalysisError::InvalidInput("Empty onset envelope".to_string()));
        }

        if !(hop_seconds > 0.0 && hop_seconds.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid envelope hop: {} s",
                hop_seconds
            )));
        }

        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(AnalysisError::InvalidInput(
                "Onset envelope values must be finite and non-negative".to_string(),
            ));
        }

        Ok(Self { values, hop_seconds })
    }

    /// Novelty values, one per frame
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the envelope has no frames
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Hop duration in seconds
    pub fn hop_seconds(&self) -> f32 {
        self.hop_seconds
    }

    /// Envelope sample rate in frames per second
    pub fn frame_rate(&self) -> f32 {
        1.0 / self.hop_seconds
    }
}

/// Extract the onset envelope of a preprocessed signal
///
/// Signals shorter than one frame are zero-padded to a single frame, so the
/// envelope is never empty.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for invalid frame parameters or a
/// hop too coarse to resolve `config.max_bpm`.
pub fn extract_onset_envelope(
    signal: &AudioSignal,
    config: &AnalysisConfig,
) -> Result<OnsetEnvelope, AnalysisError> {
    if config.frame_size == 0 || config.hop_size == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame size and hop size must be > 0".to_string(),
        ));
    }

    let hop_seconds = config.hop_size as f32 / signal.sample_rate() as f32;
    let max_hop_seconds = 60.0 / config.max_bpm / 2.0;
    if hop_seconds > max_hop_seconds {
        return Err(AnalysisError::InvalidInput(format!(
            "Envelope hop {:.1} ms cannot resolve {:.0} BPM",
            hop_seconds * 1000.0,
            config.max_bpm
        )));
    }

    let padded;
    let samples = if signal.samples().len() < config.frame_size {
        let mut buf = signal.samples().to_vec();
        buf.resize(config.frame_size, 0.0);
        padded = buf;
        &padded[..]
    } else {
        signal.samples()
    };

    log::debug!(
        "Extracting onset envelope ({}): {} samples, frame={}, hop={} ({:.1} ms)",
        config.onset_method.name(),
        samples.len(),
        config.frame_size,
        config.hop_size,
        hop_seconds * 1000.0
    );

    let raw = match config.onset_method {
        OnsetMethod::SpectralFlux => {
            let spectrogram = stft::magnitude_spectrogram(samples, config.frame_size, config.hop_size);
            spectral_flux::spectral_flux_novelty(&spectrogram)?
        }
        OnsetMethod::EnergyFlux => {
            energy_flux::energy_flux_novelty(samples, config.frame_size, config.hop_size)?
        }
    };

    let mut values = smoothing::moving_average(&raw, config.smoothing_window);
    smoothing::normalize_max(&mut values);

    log::debug!("Onset envelope: {} frames", values.len());

    OnsetEnvelope::new(values, hop_seconds)
}
