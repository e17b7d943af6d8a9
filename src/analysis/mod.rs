//! Analysis and result aggregation modules
//!
//! Turns ranked tempo candidates into the final analysis:
//! - Tempo selection (octave correction)
//! - Result types
//! - Metadata

pub mod metadata;
pub mod result;
pub mod selector;
