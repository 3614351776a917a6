//! Utility functions shared by the kernel operations.
//!
//! # Modules
//!
//! - [`audio_math`] - Pitch ratio and transform-size calculations
//! - [`scratch`] - Fallible allocation of internal scratch buffers

pub mod audio_math;
pub mod scratch;

// Re-export common utilities
pub use audio_math::*;
pub use scratch::*;
