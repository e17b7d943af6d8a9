//! Analysis result types

use super::metadata::{AnalysisFlag, AnalysisMetadata};
use crate::features::period::TempoCandidate;
use serde::{Deserialize, Serialize};

/// Final tempo estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoEstimate {
    /// Tempo in beats per minute
    pub bpm: f32,

    /// Periodicity score of the strongest candidate (0.0-1.0)
    ///
    /// This is the score of the top-ranked candidate even when octave
    /// correction reports one of its harmonics.
    pub confidence: f32,
}

impl TempoEstimate {
    /// Beat period in seconds
    ///
    /// # Example
    ///
    /// ```
    /// use rhythmic_dsp::TempoEstimate;
    ///
    /// let estimate = TempoEstimate { bpm: 120.0, confidence: 0.9 };
    /// assert_eq!(estimate.period_seconds(), 0.5);
    /// ```
    pub fn period_seconds(&self) -> f32 {
        60.0 / self.bpm
    }
}

/// Complete analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Selected tempo
    pub tempo: TempoEstimate,

    /// Ranked tempo candidates (score descending)
    pub candidates: Vec<TempoCandidate>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Whether the analysis raised `flag`
    pub fn has_flag(&self, flag: AnalysisFlag) -> bool {
        self.metadata.flags.contains(&flag)
    }
}
