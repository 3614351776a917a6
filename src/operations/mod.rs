//! Kernel operations over caller-owned sample buffers.
//!
//! Every operation is a free function in one of the implementation modules
//! and is also reachable as a method through the focused traits in
//! [`traits`], which are implemented for `[F]`.
//!
//! ## Module Organization
//!
//! - [`traits`] - Extension traits giving slices method syntax
//! - [`transforms`] - Transform engine and spectral front-end
//! - [`filtering`] - One-pole low-pass and high-pass filters
//! - [`levels`] - Peak, RMS, normalization and noise gate
//! - [`remapping`] - Tempo change and pitch shift
//! - [`types`] - Supporting types and enums
//!
//! ## Quick Start
//!
//! ```rust
//! use pcm_kernel::operations::*;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut samples = vec![0.1f64, 0.5, -0.3, 0.8, -0.2];
//!
//! // Measurement
//! let peak = samples.peak();
//! let rms = samples.rms()?;
//! assert!(rms <= peak);
//!
//! // Processing
//! samples.highpass(80.0, 44100.0)?;
//! samples.normalize_peak(0.95);
//!
//! // Analysis
//! let spectrum = samples.spectrum()?;
//! assert_eq!(spectrum.len(), samples.len());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// Public module declarations
pub mod traits;
pub mod types;

pub mod filtering;
pub mod levels;
pub mod remapping;
pub mod transforms;

// Re-export main traits for convenience
pub use traits::{AudioFiltering, AudioLevels, AudioRemapping, AudioTransforms};

// Re-export supporting types
pub use types::{FftDirection, FilterResponse, OnePoleDesign, Spectrum};
