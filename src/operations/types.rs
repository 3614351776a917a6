//! Supporting types and enums for kernel operations.
//!
//! This module contains the configuration types, enums, and result
//! structures used by the operation traits.

use crate::{KernelResult, ParameterError, RealFloat, to_precision};
use num_complex::Complex;

/// Direction of the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FftDirection {
    /// Time domain to frequency domain, twiddles `e^(-2πik/N)`.
    #[default]
    Forward,
    /// Frequency domain to time domain, twiddles `e^(+2πik/N)` and a `1/N` scale.
    Inverse,
}

impl FftDirection {
    /// Sign of the twiddle-factor exponent.
    pub fn sign<F: RealFloat>(self) -> F {
        match self {
            FftDirection::Forward => -F::one(),
            FftDirection::Inverse => F::one(),
        }
    }

    /// Returns true for [`FftDirection::Inverse`].
    pub const fn is_inverse(self) -> bool {
        matches!(self, FftDirection::Inverse)
    }
}

/// Response of a one-pole filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResponse {
    /// Low-pass filter - passes frequencies below cutoff.
    LowPass,
    /// High-pass filter - passes frequencies above cutoff.
    HighPass,
}

/// One-pole filter design parameters.
///
/// Both responses are derived from the RC circuit model:
/// `rc = 1 / (2π·cutoff)` and `dt = 1 / sample_rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePoleDesign<F: RealFloat> {
    /// Low-pass or high-pass
    pub response: FilterResponse,
    /// Cutoff frequency in Hz
    pub cutoff_frequency: F,
    /// Sample rate in Hz
    pub sample_rate: F,
}

impl<F: RealFloat> OnePoleDesign<F> {
    /// Create a low-pass design.
    pub const fn lowpass(cutoff_frequency: F, sample_rate: F) -> Self {
        Self {
            response: FilterResponse::LowPass,
            cutoff_frequency,
            sample_rate,
        }
    }

    /// Create a high-pass design.
    pub const fn highpass(cutoff_frequency: F, sample_rate: F) -> Self {
        Self {
            response: FilterResponse::HighPass,
            cutoff_frequency,
            sample_rate,
        }
    }

    /// Checks that cutoff and sample rate are finite and strictly positive.
    ///
    /// Cutoffs at or above Nyquist are accepted; the recurrence stays stable
    /// and simply passes more of the signal.
    pub fn validate(&self) -> KernelResult<()> {
        if !is_positive_finite(self.sample_rate) {
            return Err(ParameterError::invalid_value(
                "sample_rate",
                format!("must be finite and > 0, got {:?}", self.sample_rate),
            )
            .into());
        }
        if !is_positive_finite(self.cutoff_frequency) {
            return Err(ParameterError::invalid_value(
                "cutoff_frequency",
                format!("must be finite and > 0, got {:?}", self.cutoff_frequency),
            )
            .into());
        }
        Ok(())
    }

    /// Smoothing coefficient `α` of the recurrence.
    ///
    /// Low-pass: `dt / (rc + dt)`. High-pass: `rc / (rc + dt)`.
    pub fn coefficient(&self) -> F {
        let rc = F::one() / (to_precision::<F, _>(2.0) * F::PI() * self.cutoff_frequency);
        let dt = F::one() / self.sample_rate;
        match self.response {
            FilterResponse::LowPass => dt / (rc + dt),
            FilterResponse::HighPass => rc / (rc + dt),
        }
    }
}

/// A frequency-domain view of a real buffer as parallel component arrays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrum<F: RealFloat> {
    /// Real components, one per bin
    pub real: Vec<F>,
    /// Imaginary components, one per bin
    pub imag: Vec<F>,
}

impl<F: RealFloat> Spectrum<F> {
    /// Splits the first `bins` complex values into real and imaginary arrays.
    pub fn from_complex(values: &[Complex<F>], bins: usize) -> Self {
        let (real, imag) = values.iter().take(bins).map(|c| (c.re, c.im)).unzip();
        Self { real, imag }
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// Returns true if the spectrum holds no bins.
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Complex value of bin `k`, if present.
    pub fn bin(&self, k: usize) -> Option<Complex<F>> {
        Some(Complex::new(*self.real.get(k)?, *self.imag.get(k)?))
    }

    /// Magnitude `|X[k]|` of every bin.
    pub fn magnitudes(&self) -> Vec<F> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(&re, &im)| re.hypot(im))
            .collect()
    }

    /// Consumes the spectrum, returning `(real, imag)`.
    pub fn into_parts(self) -> (Vec<F>, Vec<F>) {
        (self.real, self.imag)
    }
}

pub(crate) fn is_positive_finite<F: RealFloat>(value: F) -> bool {
    value.is_finite() && value > F::zero()
}
