//! Core trait definitions for kernel operations.
//!
//! Each trait has a single responsibility and is implemented for plain
//! sample slices, so any `Vec<F>`, array or borrowed slice gets method syntax
//! for the free functions in the sibling modules. The traits hold no state.

use super::types::Spectrum;
use crate::{KernelResult, RealFloat};

/// Spectral analysis of a real buffer.
pub trait AudioTransforms<F: RealFloat> {
    /// Forward spectrum truncated to the buffer length.
    ///
    /// The buffer is zero-padded to the next power of two, transformed, and
    /// only the first `len` bins are kept.
    fn spectrum(&self) -> KernelResult<Spectrum<F>>;

    /// Forward spectrum of the zero-padded buffer, every bin kept.
    fn full_spectrum(&self) -> KernelResult<Spectrum<F>>;

    /// Writes the truncated spectrum into caller-owned outputs.
    ///
    /// # Arguments
    /// * `out_real` - Receives the real parts, must hold at least `len` values
    /// * `out_imag` - Receives the imaginary parts, must hold at least `len` values
    fn spectrum_into(&self, out_real: &mut [F], out_imag: &mut [F]) -> KernelResult<()>;
}

/// One-pole recursive filters applied in place.
pub trait AudioFiltering<F: RealFloat> {
    /// Exponential-moving-average low-pass filter.
    ///
    /// # Arguments
    /// * `cutoff_hz` - Cutoff frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    fn lowpass(&mut self, cutoff_hz: F, sample_rate: F) -> KernelResult<()>;

    /// RC high-pass filter.
    ///
    /// # Arguments
    /// * `cutoff_hz` - Cutoff frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    fn highpass(&mut self, cutoff_hz: F, sample_rate: F) -> KernelResult<()>;
}

/// Level measurement and gain operations.
pub trait AudioLevels<F: RealFloat> {
    /// Returns the peak (maximum absolute value), zero for an empty buffer.
    fn peak(&self) -> F;

    /// Computes the Root Mean Square level.
    ///
    /// Fails on an empty buffer rather than returning NaN.
    fn rms(&self) -> KernelResult<F>;

    /// Scales the buffer so its peak equals `target_level`. Silence is left alone.
    fn normalize_peak(&mut self, target_level: F);

    /// Attenuates every sample whose magnitude is below `noise_floor`.
    fn noise_gate(&mut self, noise_floor: F, reduction_factor: F);
}

/// Resampling-based time and pitch remapping.
pub trait AudioRemapping<F: RealFloat> {
    /// Resamples to `floor(len / tempo_factor)` samples.
    fn tempo_change(&self, tempo_factor: F) -> KernelResult<Vec<F>>;

    /// Shifts pitch by `semitones` in place, keeping the length.
    fn pitch_shift(&mut self, sample_rate: F, semitones: F) -> KernelResult<()>;
}
