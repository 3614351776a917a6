//! Audio mathematics used by the spectral and remapping operations.
//!
//! # Examples
//!
//! ```rust
//! use pcm_kernel::utils::audio_math::{semitones_to_ratio, transform_size};
//!
//! // One octave up doubles the frequency
//! assert_eq!(semitones_to_ratio(12.0f64), 2.0);
//!
//! // Buffers are zero-padded to the next power of two
//! assert_eq!(transform_size(1000).unwrap(), 1024);
//! ```

use crate::{KernelResult, ParameterError, RealFloat, to_precision};

// =============================================================================
// PITCH
// =============================================================================

/// Converts a semitone offset into a frequency ratio.
///
/// Uses the equal-tempered relation `ratio = 2^(semitones / 12)`. Integral
/// multiples of twelve map to exact powers of two, so `±24` semitones give
/// exactly `4.0` and `0.25`.
pub fn semitones_to_ratio<F: RealFloat>(semitones: F) -> F {
    to_precision::<F, _>(2.0).powf(semitones / to_precision::<F, _>(12.0))
}

/// Converts a frequency ratio back into a semitone offset.
///
/// Non-positive ratios have no pitch equivalent and yield NaN or -inf.
pub fn ratio_to_semitones<F: RealFloat>(ratio: F) -> F {
    to_precision::<F, _>(12.0) * ratio.log2()
}

// =============================================================================
// TRANSFORM SIZES
// =============================================================================

/// Smallest power of two that can hold `len` samples.
///
/// An empty buffer still maps to a single-point transform, so the result is
/// never zero.
///
/// # Errors
/// Returns an error if the padded size does not fit in `usize`.
pub fn transform_size(len: usize) -> KernelResult<usize> {
    len.checked_next_power_of_two().ok_or_else(|| {
        ParameterError::invalid_value(
            "length",
            format!("{len} samples cannot be padded to a power of two"),
        )
        .into()
    })
}

/// Returns true if `len` is a valid length for the transform engine.
///
/// Lengths 0 and 1 are accepted as degenerate transforms.
pub const fn is_transform_length(len: usize) -> bool {
    len <= 1 || len.is_power_of_two()
}
