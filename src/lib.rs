//! # Rhythmic DSP
//!
//! A tempo estimation engine: decoded audio in, a single BPM estimate out.
//!
//! ## Features
//!
//! - **Onset envelope**: log-compressed spectral flux (or energy flux) at ~86 frames/s
//! - **Periodicity**: envelope autocorrelation scored with a harmonic comb over a BPM grid
//! - **Octave correction**: harmonically related candidates resolved toward the foot-tap range
//! - **Narrow boundary**: `f32` BPM with a `0.0` failure sentinel, also exported over a C ABI
//!
//! ## Quick Start
//!
//! ```no_run
//! use rhythmic_dsp::{analyze_audio, AnalysisConfig};
//!
//! // Interleaved f32 samples in [-1.0, 1.0]
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//! let channels = 2;
//!
//! let result = analyze_audio(&samples, sample_rate, channels, &AnalysisConfig::default())?;
//!
//! println!("BPM: {:.2} (confidence: {:.2})", result.tempo.bpm, result.tempo.confidence);
//! # Ok::<(), rhythmic_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline follows this flow:
//!
//! ```text
//! Audio Input → Preprocessing → Onset Envelope → Periodicity → Tempo Selection → Output
//! ```
//!
//! Every call is synchronous and self-contained; callers should run it off
//! latency-sensitive threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod features;
pub mod ffi;
pub mod handler;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::metadata::{AnalysisFlag, AnalysisMetadata};
pub use analysis::result::{AnalysisResult, TempoEstimate};
pub use analyzer::TempoAnalyzer;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use features::onset::OnsetMethod;
pub use features::period::TempoCandidate;
pub use handler::TempoHandler;
pub use io::{AudioDecoder, DecodedAudio, SymphoniaDecoder};

use std::time::Instant;

/// Main analysis function
///
/// Runs the full pipeline on a decoded buffer and returns the selected tempo
/// with its ranked candidates and metadata.
///
/// # Arguments
///
/// * `samples` - Interleaved audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `channels` - Number of interleaved channels
/// * `config` - Analysis configuration parameters
///
/// # Errors
///
/// - `InvalidInput`: empty or corrupt buffer, invalid configuration
/// - `ResourceExhausted`: input longer than `config.max_duration_seconds`
/// - `NoDominantTempo`: silent or arrhythmic input
/// - `ProcessingError`: internal stage failure
///
/// # Example
///
/// ```
/// use rhythmic_dsp::{analyze_audio, AnalysisConfig, AnalysisError};
///
/// let silence = vec![0.0f32; 44100 * 5];
/// let result = analyze_audio(&silence, 44100, 1, &AnalysisConfig::default());
/// assert!(matches!(result, Err(AnalysisError::NoDominantTempo(_))));
/// ```
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    channels: usize,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();

    log::debug!(
        "Starting tempo analysis: {} samples at {} Hz, {} channels",
        samples.len(),
        sample_rate,
        channels
    );

    config.validate()?;

    // Stage 1: Preprocessing
    let signal = preprocessing::preprocess(samples, sample_rate, channels, config)?;

    // Stage 2: Onset envelope
    let envelope = features::onset::extract_onset_envelope(&signal, config)?;

    // Stage 3: Periodicity
    let candidates = features::period::estimate_periodicity(&envelope, config)?;

    // Stage 4: Tempo selection
    let selection = analysis::selector::select_tempo(&candidates, config)?;

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    log::debug!(
        "Tempo {:.2} BPM (confidence {:.3}) in {:.1} ms",
        selection.estimate.bpm,
        selection.estimate.confidence,
        processing_time_ms
    );

    Ok(AnalysisResult {
        tempo: selection.estimate,
        candidates,
        metadata: AnalysisMetadata {
            duration_seconds: signal.duration_seconds(),
            sample_rate: signal.sample_rate(),
            source_channels: signal.source_channels(),
            input_peak_db: signal.level().peak_db,
            input_rms_db: signal.level().rms_db,
            envelope_frames: envelope.len(),
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            onset_method: config.onset_method.name().to_string(),
            flags: selection.flags,
        },
    })
}

/// Estimate the tempo of an audio file
///
/// Decodes `source` (a path or `file://` URL) with [`SymphoniaDecoder`] and
/// runs [`analyze_audio`].
///
/// # Errors
///
/// As [`analyze_audio`], plus `InvalidInput` for an unsupported source and
/// `DecodingError` when the file cannot be read or decoded.
pub fn estimate_tempo(source: &str, config: &AnalysisConfig) -> Result<TempoEstimate, AnalysisError> {
    TempoAnalyzer::with_config(config.clone()).estimate_tempo(source)
}
