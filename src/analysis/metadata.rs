//! Analysis metadata structures

use serde::{Deserialize, Serialize};

/// Analysis flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Unrelated tempo peaks almost as strong as the primary one
    MultimodalTempo,
    /// Reported tempo is a harmonic of the strongest periodicity
    OctaveCorrected,
}

/// Analysis metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Analyzed duration in seconds (after silence trimming)
    pub duration_seconds: f32,

    /// Analysis sample rate in Hz
    pub sample_rate: u32,

    /// Channel count of the input
    pub source_channels: usize,

    /// Peak level of the mono mix in dBFS, before normalization
    pub input_peak_db: f32,

    /// RMS level of the mono mix in dBFS, before normalization
    pub input_rms_db: f32,

    /// Number of onset envelope frames
    pub envelope_frames: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Onset novelty function used
    pub onset_method: String,

    /// Analysis flags
    pub flags: Vec<AnalysisFlag>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            duration_seconds: 0.0,
            sample_rate: 0,
            source_channels: 0,
            input_peak_db: 0.0,
            input_rms_db: 0.0,
            envelope_frames: 0,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            onset_method: String::new(),
            flags: vec![],
        }
    }
}
