//! Audio decoding using Symphonia

use crate::error::AnalysisError;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// Decoded PCM audio
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: usize,
}

impl DecodedAudio {
    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }
}

/// Decoding collaborator
///
/// Implementations must be shareable across threads so one analyzer can
/// serve parallel batch analysis.
pub trait AudioDecoder: Send + Sync {
    /// Decode a local audio file to interleaved `f32` samples
    ///
    /// # Errors
    ///
    /// Implementations return `AnalysisError::ResourceExhausted` as soon as
    /// the source is known to exceed `max_duration_seconds`, without
    /// decoding the rest of it.
    fn decode(&self, path: &Path, max_duration_seconds: f32) -> Result<DecodedAudio, AnalysisError>;
}

/// Default decoder backed by Symphonia
///
/// Probes the container using the file extension as a hint, decodes the
/// first non-null track, and skips packets that fail to decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

fn decoding_error(path: &Path, err: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::DecodingError(format!("{}: {}", path.display(), err))
}

fn too_long(path: &Path, seconds: f64, max_duration_seconds: f32) -> AnalysisError {
    AnalysisError::ResourceExhausted(format!(
        "{}: longer than {:.0} s (at least {:.0} s)",
        path.display(),
        max_duration_seconds,
        seconds
    ))
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path, max_duration_seconds: f32) -> Result<DecodedAudio, AnalysisError> {
        log::debug!("Decoding audio file: {}", path.display());

        let file = File::open(path).map_err(|e| decoding_error(path, e))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| decoding_error(path, e))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| decoding_error(path, "no supported audio track"))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
        let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0);

        // Reject from the header when the container declares its length
        if let Some(n_frames) = track.codec_params.n_frames.filter(|_| sample_rate > 0) {
            let seconds = n_frames as f64 / sample_rate as f64;
            if seconds > max_duration_seconds as f64 {
                return Err(too_long(path, seconds, max_duration_seconds));
            }
        }

        let mut decoder = get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| decoding_error(path, e))?;

        let mut samples: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut skipped = 0usize;
        let mut decoded_frames = 0u64;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(decoding_error(path, e)),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    // Corrupted packet
                    skipped += 1;
                    log::trace!("Skipping undecodable packet: {}", msg);
                    continue;
                }
                Err(e) => return Err(decoding_error(path, e)),
            };

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            sample_rate = spec.rate;
            channels = spec.channels.count();

            // Streams without a declared length are bounded while decoding
            decoded_frames += decoded.frames() as u64;
            let seconds = decoded_frames as f64 / sample_rate.max(1) as f64;
            if seconds > max_duration_seconds as f64 {
                return Err(too_long(path, seconds, max_duration_seconds));
            }

            let needs_alloc = sample_buf
                .as_ref()
                .map_or(true, |buf| buf.capacity() < decoded.capacity());
            if needs_alloc {
                sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
            }

            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
        }

        if skipped > 0 {
            log::warn!("{}: skipped {} corrupt packets", path.display(), skipped);
        }

        if samples.is_empty() || sample_rate == 0 || channels == 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "{}: no audio frames decoded",
                path.display()
            )));
        }

        log::debug!(
            "Decoded {} frames at {} Hz, {} channels",
            samples.len() / channels,
            sample_rate,
            channels
        );

        Ok(DecodedAudio {
            samples,
            sample_rate,
            channels,
        })
    }
}
