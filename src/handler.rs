//! Narrow tempo boundary
//!
//! Collapses every failure into a `0.0` sentinel so hosts only deal with
//! primitives. Use [`crate::TempoAnalyzer`] when failures must be told apart.

use crate::analyzer::TempoAnalyzer;
use crate::config::AnalysisConfig;

/// Primitive-typed tempo entry point
///
/// # Example
///
/// ```
/// use rhythmic_dsp::TempoHandler;
///
/// let handler = TempoHandler::new();
/// assert_eq!(handler.analyze_rhythm("/does/not/exist.wav"), 0.0);
/// assert_eq!(handler.tempo("/does/not/exist.wav", None), None);
/// ```
#[derive(Debug, Default)]
pub struct TempoHandler {
    analyzer: TempoAnalyzer,
}

impl TempoHandler {
    /// Handler with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler with a custom configuration
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self {
            analyzer: TempoAnalyzer::with_config(config),
        }
    }

    /// Handler wrapping an existing analyzer
    pub fn with_analyzer(analyzer: TempoAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Tempo of `source` in BPM, or `0.0` on any failure
    pub fn analyze_rhythm(&self, source: &str) -> f32 {
        match self.analyzer.estimate_tempo(source) {
            Ok(estimate) => estimate.bpm,
            Err(e) => {
                log::debug!("Tempo analysis of {} failed: {}", source, e);
                0.0
            }
        }
    }

    /// Tempo of `source`, `None` when no tempo was found
    ///
    /// `completion`, when given, receives the same value before it is returned.
    pub fn tempo(&self, source: &str, completion: Option<&dyn Fn(Option<f64>)>) -> Option<f64> {
        let bpm = self.analyze_rhythm(source);
        let tempo = (bpm > 0.0).then_some(f64::from(bpm));
        if let Some(callback) = completion {
            callback(tempo);
        }
        tempo
    }
}
