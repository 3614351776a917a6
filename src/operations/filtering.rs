//! One-pole IIR filter implementations.
//!
//! Both filters come from the RC circuit model and run a single O(n) pass
//! over the buffer, in place.

use super::traits::AudioFiltering;
use super::types::OnePoleDesign;
use crate::utils::try_filled;
use crate::{KernelResult, RealFloat};

/// Applies the one-pole low-pass filter in place.
///
/// Coefficient `α = dt / (rc + dt)`; recurrence `y[0] = x[0]`,
/// `y[i] = y[i-1] + α·(x[i] − y[i-1])`.
///
/// `y[i-1]` is the value already written back into `samples`, carried in a
/// single running accumulator. The loop is strictly sequential.
///
/// # Errors
/// Returns an invalid-value error, leaving `samples` untouched, if the cutoff
/// or sample rate is not finite and positive.
///
/// # Examples
/// ```rust
/// use pcm_kernel::lowpass;
///
/// let mut samples = vec![1.0f64, -1.0, 1.0, -1.0];
/// lowpass(&mut samples, 10.0, 44100.0).unwrap();
/// assert_eq!(samples[0], 1.0);
/// assert!(samples[3] > 0.99);
/// ```
pub fn lowpass<F: RealFloat>(samples: &mut [F], cutoff_hz: F, sample_rate: F) -> KernelResult<()> {
    let design = OnePoleDesign::lowpass(cutoff_hz, sample_rate);
    design.validate()?;
    let alpha = design.coefficient();

    let Some((first, rest)) = samples.split_first_mut() else {
        return Ok(());
    };
    let mut previous = *first;
    for sample in rest.iter_mut() {
        previous = previous + alpha * (*sample - previous);
        *sample = previous;
    }
    Ok(())
}

/// Applies the one-pole high-pass filter in place.
///
/// Coefficient `α = rc / (rc + dt)`; recurrence `y[0] = x[0]`,
/// `y[i] = α·(y[i-1] + x[i] − x[i-1])` where `x[i-1]` is the original
/// input. Output is built in a scratch buffer and copied back at the end.
///
/// # Errors
/// Returns an invalid-value error for a bad cutoff or sample rate, or an
/// allocation error if the scratch buffer cannot be reserved. `samples` is
/// untouched in both cases.
pub fn highpass<F: RealFloat>(samples: &mut [F], cutoff_hz: F, sample_rate: F) -> KernelResult<()> {
    let design = OnePoleDesign::highpass(cutoff_hz, sample_rate);
    design.validate()?;
    let alpha = design.coefficient();

    if samples.is_empty() {
        return Ok(());
    }

    let mut filtered = try_filled(samples.len(), F::zero(), "highpass scratch")?;
    filtered[0] = samples[0];
    for i in 1..samples.len() {
        filtered[i] = alpha * (filtered[i - 1] + samples[i] - samples[i - 1]);
    }

    samples.copy_from_slice(&filtered);
    Ok(())
}

impl<F: RealFloat> AudioFiltering<F> for [F] {
    fn lowpass(&mut self, cutoff_hz: F, sample_rate: F) -> KernelResult<()> {
        lowpass(self, cutoff_hz, sample_rate)
    }

    fn highpass(&mut self, cutoff_hz: F, sample_rate: F) -> KernelResult<()> {
        highpass(self, cutoff_hz, sample_rate)
    }
}
