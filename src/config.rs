//! Configuration parameters for tempo analysis

use crate::error::AnalysisError;
use crate::features::onset::OnsetMethod;
use serde::{Deserialize, Serialize};

/// Finest accepted BPM grid step
const MIN_BPM_RESOLUTION: f32 = 0.01;

/// Analysis configuration parameters
///
/// Deserializes with `#[serde(default)]`, so a partial JSON document only
/// overrides the fields it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Preprocessing
    /// Fixed analysis sample rate in Hz (default: 22050)
    pub analysis_sample_rate: u32,

    /// Silence threshold in dBFS (default: -60.0)
    /// Inputs whose peak is below this are treated as silent; frames below it
    /// are trimmed from both ends when `trim_silence` is set
    pub min_amplitude_db: f32,

    /// Trim leading/trailing silence (default: true)
    pub trim_silence: bool,

    /// Longest accepted input in seconds (default: 3600.0)
    pub max_duration_seconds: f32,

    // Onset envelope
    /// Analysis window in samples (default: 1024)
    pub frame_size: usize,

    /// Hop between analysis windows in samples (default: 256)
    pub hop_size: usize,

    /// Novelty function used for the onset envelope (default: SpectralFlux)
    pub onset_method: OnsetMethod,

    /// Moving-average width in frames applied to the envelope (default: 3)
    pub smoothing_window: usize,

    // Periodicity
    /// Minimum BPM to consider (default: 40.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 208.0)
    pub max_bpm: f32,

    /// Candidate grid step in BPM (default: 0.5)
    pub bpm_resolution: f32,

    /// Number of period multiples summed per candidate (default: 4)
    pub max_harmonics: usize,

    /// Candidates closer than this many BPM are merged (default: 1.0)
    pub merge_delta_bpm: f32,

    // Selection
    /// Minimum top score for a tempo to be reported (default: 0.1)
    pub min_score: f32,

    /// Relative score tolerance for octave correction (default: 0.2)
    /// A harmonic within `(1 - tolerance) * top_score` competes with the top candidate
    pub octave_tolerance: f32,

    /// Lower edge of the preferred foot-tap range (default: 80.0)
    pub foot_tap_min_bpm: f32,

    /// Upper edge of the preferred foot-tap range (default: 160.0)
    pub foot_tap_max_bpm: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_sample_rate: 22050,
            min_amplitude_db: -60.0,
            trim_silence: true,
            max_duration_seconds: 3600.0,
            frame_size: 1024,
            hop_size: 256,
            onset_method: OnsetMethod::SpectralFlux,
            smoothing_window: 3,
            min_bpm: 40.0,
            max_bpm: 208.0,
            bpm_resolution: 0.5,
            max_harmonics: 4,
            merge_delta_bpm: 1.0,
            min_score: 0.1,
            octave_tolerance: 0.2,
            foot_tap_min_bpm: 80.0,
            foot_tap_max_bpm: 160.0,
        }
    }
}

impl AnalysisConfig {
    /// Hop duration in seconds at the analysis sample rate
    pub fn hop_seconds(&self) -> f32 {
        self.hop_size as f32 / self.analysis_sample_rate as f32
    }

    /// Check parameter consistency
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.analysis_sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "analysis_sample_rate must be > 0".to_string(),
            ));
        }

        if self.frame_size == 0 || self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "frame_size and hop_size must be > 0 (got {} / {})",
                self.frame_size, self.hop_size
            )));
        }

        if self.hop_size > self.frame_size {
            return Err(AnalysisError::InvalidInput(format!(
                "hop_size ({}) larger than frame_size ({})",
                self.hop_size, self.frame_size
            )));
        }

        if !(self.min_bpm > 0.0 && self.max_bpm > self.min_bpm) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                self.min_bpm, self.max_bpm
            )));
        }

        if !(self.bpm_resolution >= MIN_BPM_RESOLUTION) {
            return Err(AnalysisError::InvalidInput(format!(
                "BPM resolution must be >= {}, got {}",
                MIN_BPM_RESOLUTION, self.bpm_resolution
            )));
        }

        if !(self.merge_delta_bpm >= 0.0 && self.merge_delta_bpm.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "merge_delta_bpm must be finite and >= 0, got {}",
                self.merge_delta_bpm
            )));
        }

        if !(self.min_score >= 0.0 && self.min_score <= 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "min_score must be in [0, 1], got {}",
                self.min_score
            )));
        }

        if !self.min_amplitude_db.is_finite() {
            return Err(AnalysisError::InvalidInput(format!(
                "min_amplitude_db must be finite, got {}",
                self.min_amplitude_db
            )));
        }

        if self.max_harmonics == 0 {
            return Err(AnalysisError::InvalidInput(
                "max_harmonics must be >= 1".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.octave_tolerance) {
            return Err(AnalysisError::InvalidInput(format!(
                "octave_tolerance must be in [0, 1), got {:.2}",
                self.octave_tolerance
            )));
        }

        if !(self.foot_tap_min_bpm > 0.0 && self.foot_tap_max_bpm > self.foot_tap_min_bpm) {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid foot-tap range: [{:.1}, {:.1}]",
                self.foot_tap_min_bpm, self.foot_tap_max_bpm
            )));
        }

        if !(self.max_duration_seconds > 0.0) {
            return Err(AnalysisError::InvalidInput(
                "max_duration_seconds must be > 0".to_string(),
            ));
        }

        // The envelope must resolve the fastest tempo without aliasing
        let max_hop_seconds = 60.0 / self.max_bpm / 2.0;
        if self.hop_seconds() > max_hop_seconds {
            return Err(AnalysisError::InvalidInput(format!(
                "Hop of {:.1} ms exceeds {:.1} ms (half the period of {:.0} BPM)",
                self.hop_seconds() * 1000.0,
                max_hop_seconds * 1000.0,
                self.max_bpm
            )));
        }

        Ok(())
    }
}
