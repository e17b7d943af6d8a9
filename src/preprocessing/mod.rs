//! Audio preprocessing modules
//!
//! Turns a decoded buffer into the fixed-rate mono [`AudioSignal`] the
//! onset extractor consumes:
//! - Channel mixing (interleaved to mono)
//! - Resampling to the analysis rate
//! - Peak normalization
//! - Silence detection and trimming

pub mod channel_mixer;
pub mod normalization;
pub mod resample;
pub mod silence;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use normalization::LevelMetadata;

/// Mono audio at the analysis sample rate
///
/// Invariants: `sample_rate > 0`, samples finite and non-empty. Only
/// [`preprocess`] constructs it, and it is read-only afterwards.
#[derive(Debug, Clone)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
    source_channels: usize,
    level: LevelMetadata,
}

impl AudioSignal {
    /// Mono samples, peak-normalized
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Channel count of the buffer this signal was mixed from
    pub fn source_channels(&self) -> usize {
        self.source_channels
    }

    /// Levels measured before peak normalization
    pub fn level(&self) -> &LevelMetadata {
        &self.level
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Run the preprocessing chain on a decoded buffer
///
/// # Arguments
///
/// * `interleaved` - Decoded samples, interleaved when `channels > 1`
/// * `sample_rate` - Source sample rate in Hz
/// * `channels` - Number of interleaved channels
/// * `config` - Analysis configuration
///
/// # Errors
///
/// - `InvalidInput`: empty buffer, zero rate/channels, ragged frames, NaN/Inf samples
/// - `ResourceExhausted`: source longer than `config.max_duration_seconds`
/// - `NoDominantTempo`: peak below `config.min_amplitude_db` (silence)
pub fn preprocess(
    interleaved: &[f32],
    sample_rate: u32,
    channels: usize,
    config: &AnalysisConfig,
) -> Result<AudioSignal, AnalysisError> {
    if interleaved.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty audio samples".to_string()));
    }

    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput("Invalid sample rate: 0".to_string()));
    }

    if channels == 0 {
        return Err(AnalysisError::InvalidInput("Invalid channel count: 0".to_string()));
    }

    if let Some(idx) = interleaved.iter().position(|x| !x.is_finite()) {
        return Err(AnalysisError::InvalidInput(format!(
            "Non-finite sample at index {}",
            idx
        )));
    }

    let duration_seconds = (interleaved.len() / channels) as f64 / sample_rate as f64;
    if duration_seconds > config.max_duration_seconds as f64 {
        return Err(AnalysisError::ResourceExhausted(format!(
            "Input is {:.0} s long, limit is {:.0} s",
            duration_seconds, config.max_duration_seconds
        )));
    }

    log::debug!(
        "Preprocessing {:.2} s of {}-channel audio at {} Hz",
        duration_seconds,
        channels,
        sample_rate
    );

    let mono = channel_mixer::downmix_to_mono(interleaved, channels)?;

    if silence::is_silent(&mono, config.min_amplitude_db) {
        return Err(AnalysisError::NoDominantTempo(format!(
            "Input is silent (peak below {:.1} dBFS)",
            config.min_amplitude_db
        )));
    }

    let mut samples = resample::resample_mono(&mono, sample_rate, config.analysis_sample_rate)?;
    let level = normalization::normalize_peak(&mut samples, 1.0)?;

    if config.trim_silence {
        let detector = silence::SilenceDetector {
            threshold_db: config.min_amplitude_db,
            frame_size: config.frame_size,
        };
        let (trimmed, _range) = silence::detect_and_trim(&samples, &detector)?;
        if trimmed.is_empty() {
            return Err(AnalysisError::NoDominantTempo(
                "Audio is entirely silent after trimming".to_string(),
            ));
        }
        samples = trimmed;
    }

    Ok(AudioSignal {
        samples,
        sample_rate: config.analysis_sample_rate,
        source_channels: channels,
        level,
    })
}
