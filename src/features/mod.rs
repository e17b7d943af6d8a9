//! Feature extraction modules
//!
//! This module contains the rhythm feature extraction algorithms:
//! - Onset envelope (spectral flux or energy flux)
//! - Period estimation (BPM candidates)

pub mod onset;
pub mod period;
