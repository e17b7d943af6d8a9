//! Audio I/O modules
//!
//! Source resolution, audio decoding using Symphonia, and frame buffering.

pub mod decoder;
pub mod sample_buffer;
pub mod source;

pub use decoder::{AudioDecoder, DecodedAudio, SymphoniaDecoder};
pub use source::resolve_source;
