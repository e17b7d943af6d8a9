//! Stateless tempo analyzer
//!
//! [`TempoAnalyzer`] bundles a configuration with a decoding collaborator.
//! It holds no per-call state, so one instance can be shared across threads.

use crate::analysis::result::{AnalysisResult, TempoEstimate};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::{resolve_source, AudioDecoder, SymphoniaDecoder};
use rayon::prelude::*;

/// Tempo analyzer owning a configuration and a decoder
///
/// # Example
///
/// ```no_run
/// use rhythmic_dsp::TempoAnalyzer;
///
/// let analyzer = TempoAnalyzer::new();
/// let estimate = analyzer.estimate_tempo("file:///music/track.mp3")?;
/// println!("{:.1} BPM", estimate.bpm);
/// # Ok::<(), rhythmic_dsp::AnalysisError>(())
/// ```
pub struct TempoAnalyzer {
    config: AnalysisConfig,
    decoder: Box<dyn AudioDecoder>,
}

impl std::fmt::Debug for TempoAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TempoAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for TempoAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TempoAnalyzer {
    /// Analyzer with the default configuration and Symphonia decoding
    pub fn new() -> Self {
        Self::with_config(AnalysisConfig::default())
    }

    /// Analyzer with a custom configuration and Symphonia decoding
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self::with_decoder(config, Box::new(SymphoniaDecoder::new()))
    }

    /// Analyzer with a custom configuration and decoder
    pub fn with_decoder(config: AnalysisConfig, decoder: Box<dyn AudioDecoder>) -> Self {
        Self { config, decoder }
    }

    /// Active configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Estimate the tempo of a file
    ///
    /// # Errors
    ///
    /// See [`TempoAnalyzer::analyze_file`].
    pub fn estimate_tempo(&self, source: &str) -> Result<TempoEstimate, AnalysisError> {
        self.analyze_file(source).map(|result| result.tempo)
    }

    /// Decode and analyze a file
    ///
    /// # Arguments
    ///
    /// * `source` - Filesystem path or `file://` URL
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: unsupported source, no audio frames decoded, bad samples
    /// - `DecodingError`: unreadable file or unsupported format
    /// - `NoDominantTempo` / `ResourceExhausted` / `ProcessingError`: as [`crate::analyze_audio`]
    pub fn analyze_file(&self, source: &str) -> Result<AnalysisResult, AnalysisError> {
        let path = resolve_source(source)?;
        let audio = self.decoder.decode(&path, self.config.max_duration_seconds)?;
        self.analyze_samples(&audio.samples, audio.sample_rate, audio.channels)
    }

    /// Analyze an already decoded interleaved buffer
    ///
    /// # Errors
    ///
    /// See [`crate::analyze_audio`].
    pub fn analyze_samples(
        &self,
        samples: &[f32],
        sample_rate: u32,
        channels: usize,
    ) -> Result<AnalysisResult, AnalysisError> {
        crate::analyze_audio(samples, sample_rate, channels, &self.config)
    }

    /// Analyze many files in parallel
    ///
    /// Runs on the global rayon pool. Returns one result per source, in input
    /// order; one failing file does not affect the others.
    pub fn analyze_batch<S>(&self, sources: &[S]) -> Vec<Result<AnalysisResult, AnalysisError>>
    where
        S: AsRef<str> + Sync,
    {
        log::debug!("Analyzing batch of {} sources", sources.len());

        sources
            .par_iter()
            .map(|source| {
                let source = source.as_ref();
                let result = self.analyze_file(source);
                if let Err(e) = &result {
                    log::warn!("{}: {}", source, e);
                }
                result
            })
            .collect()
    }
}
