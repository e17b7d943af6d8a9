//! Error types for the tempo analysis engine

use std::fmt;

/// Errors that can occur during tempo analysis
///
/// The narrow boundary ([`crate::handler::TempoHandler`]) collapses all of
/// these into a `0.0` sentinel; the rich API keeps them distinguishable.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input (empty or corrupt buffer, bad parameters, bad source)
    InvalidInput(String),

    /// Audio decoding error reported by the decoding collaborator
    DecodingError(String),

    /// Well-formed input without a confident tempo (silence, arrhythmic audio)
    NoDominantTempo(String),

    /// Input far exceeds the expected track length
    ResourceExhausted(String),

    /// Processing error inside a pipeline stage
    ProcessingError(String),
}

impl AnalysisError {
    /// True for the "no confident tempo" outcome
    pub fn is_no_dominant_tempo(&self) -> bool {
        matches!(self, AnalysisError::NoDominantTempo(_))
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            AnalysisError::NoDominantTempo(msg) => write!(f, "No dominant tempo: {}", msg),
            AnalysisError::ResourceExhausted(msg) => write!(f, "Resource exhausted: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}
