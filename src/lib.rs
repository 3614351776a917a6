// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions
#![warn(missing_docs)] // Documentation is a must for release

//! # pcm_kernel
//!
//! A small, stateless signal-processing kernel for mono PCM buffers.
//!
//! ## Overview
//!
//! Every operation works on a caller-owned slice of samples (nominally in
//! `[-1, 1]`), either mutating it in place or writing into a caller-supplied
//! output. Nothing is retained between calls, so operations are re-entrant
//! across independent buffers.
//!
//! - **Transforms**: in-place radix-2 FFT/IFFT and a zero-padding spectral
//!   front-end for arbitrary-length real buffers.
//! - **Filtering**: single-pole lowpass and highpass filters.
//! - **Levels**: peak normalization, RMS metering and a time-domain noise gate.
//! - **Remapping**: resampling tempo change and fixed-length pitch shift.
//!
//! ## Features
//!
//! - `ffi` (default): C ABI entry points returning integer status codes.
//! - `python`: a `pcm_kernel` Python extension module built with `pyo3`.
//!
//! ## Error Handling
//!
//! Fallible operations return [`KernelResult`]. Errors are hierarchical so a
//! caller can separate bad input from unsupported parameter values and from
//! allocation failures:
//!
//! ```rust
//! use pcm_kernel::{KernelError, ParameterError, StatusCode, pitch_shift};
//!
//! let mut samples = vec![0.0f64, 0.5, 1.0, 0.5];
//! match pitch_shift(&mut samples, 44100.0, 36.0) {
//!     Ok(()) => {}
//!     Err(KernelError::Parameter(ParameterError::OutOfRange { value, .. })) => {
//!         eprintln!("pitch ratio {value} is too extreme");
//!     }
//!     Err(other) => eprintln!("Other error: {other}"),
//! }
//!
//! // The buffer is untouched after a rejected call.
//! assert_eq!(samples, vec![0.0, 0.5, 1.0, 0.5]);
//! ```
//!
//! ## Quick Start
//!
//! ### Spectra
//!
//! ```rust
//! use pcm_kernel::spectrum;
//!
//! let samples = [0.0f64, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
//! let spectrum = spectrum(&samples).unwrap();
//! let magnitudes = spectrum.magnitudes();
//! assert!(magnitudes[2] > 3.9 && magnitudes[6] > 3.9);
//! ```
//!
//! ### Filtering and levels
//!
//! ```rust
//! use pcm_kernel::{AudioFiltering, AudioLevels};
//!
//! let mut samples = vec![0.2f64, -0.4, 0.3, -0.1];
//! samples.lowpass(8000.0, 44100.0).unwrap();
//! samples.normalize_peak(0.95);
//! assert!((samples.peak() - 0.95).abs() < 1e-12);
//! let level = samples.rms().unwrap();
//! assert!(level > 0.0);
//! ```
//!
//! ### Tempo and pitch
//!
//! ```rust
//! use pcm_kernel::{pitch_shift, tempo_change};
//!
//! let samples: Vec<f64> = (0..100).map(|i| (i as f64 * 0.1).sin() * 0.5).collect();
//! let faster = tempo_change(&samples, 2.0).unwrap();
//! assert_eq!(faster.len(), 50);
//!
//! let mut shifted = samples.clone();
//! pitch_shift(&mut shifted, 44100.0, 12.0).unwrap();
//! assert_eq!(shifted.len(), samples.len());
//! ```
//!
//! ## License
//!
//! MIT License

mod error;

pub mod operations;
/// Shared math and scratch-buffer helpers.
pub mod utils;

#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "python")]
mod python;

use std::fmt::Debug;

pub use crate::error::{
    AllocationError, KernelError, KernelResult, ParameterError, StatusCode,
};
pub use crate::operations::{
    AudioFiltering, AudioLevels, AudioRemapping, AudioTransforms,
    filtering::{highpass, lowpass},
    levels::{noise_gate, normalize_peak, peak, rms},
    remapping::{
        MAX_PITCH_RATIO, MIN_PITCH_RATIO, pitch_shift, tempo_change, tempo_change_into,
        tempo_output_len,
    },
    transforms::{
        fft_in_place, full_spectrum, ifft_in_place, inverse_spectrum, spectrum, spectrum_into,
        transform, transform_parts,
    },
    types::{FftDirection, Spectrum},
};
pub use crate::utils::audio_math::{ratio_to_semitones, semitones_to_ratio};

// Re-export the complex type used by the transform engine
pub use num_complex::Complex;

use num_traits::{Float, FloatConst, NumCast};

/// Marker trait for real floating-point types (f32, f64)
pub trait RealFloat: Float + FloatConst + NumCast + Debug + Send + Sync + 'static {}

impl RealFloat for f32 {}
impl RealFloat for f64 {}

/// Casts a numeric value into the target floating-point type `F`.
///
/// Lets generic kernel code write constants and index arithmetic once for
/// both `f32` and `f64`. When `F` and `T` are the same type this is a no-op.
///
/// # Examples
/// ```
/// use pcm_kernel::to_precision;
///
/// let value_f32: f32 = to_precision(42usize);
/// assert_eq!(value_f32, 42.0);
///
/// let value_f64: f64 = to_precision(0.25f32);
/// assert_eq!(value_f64, 0.25);
/// ```
///
/// # Panics
/// Panics if the numeric conversion fails. Conversions into `f32`/`f64` from
/// integers and finite floats always succeed.
#[inline(always)]
pub fn to_precision<F, T>(value: T) -> F
where
    F: RealFloat + NumCast,
    T: NumCast,
{
    NumCast::from(value).expect("to_precision: valid numeric conversion")
}
