//! Level measurement and gain operations.
//!
//! Peak and RMS metering, peak normalization, and a memoryless noise gate.
//! All of them are single passes over the buffer with no scratch memory.

use super::traits::AudioLevels;
use crate::{KernelResult, ParameterError, RealFloat, to_precision};

/// Returns the maximum absolute sample value, or zero for an empty buffer.
pub fn peak<F: RealFloat>(samples: &[F]) -> F {
    samples
        .iter()
        .fold(F::zero(), |peak, &sample| peak.max(sample.abs()))
}

/// Computes the Root Mean Square level `sqrt(mean(x²))`.
///
/// # Errors
/// Returns an invalid-value error for an empty buffer, where the mean is
/// undefined.
///
/// # Examples
/// ```rust
/// use pcm_kernel::rms;
///
/// let level = rms(&[0.5f64, -0.5, 0.5, -0.5]).unwrap();
/// assert_eq!(level, 0.5);
/// assert!(rms::<f64>(&[]).is_err());
/// ```
pub fn rms<F: RealFloat>(samples: &[F]) -> KernelResult<F> {
    if samples.is_empty() {
        return Err(ParameterError::invalid_value(
            "samples",
            "cannot compute the RMS of an empty buffer",
        )
        .into());
    }

    let sum_of_squares = samples
        .iter()
        .fold(F::zero(), |sum, &sample| sum + sample * sample);
    Ok((sum_of_squares / to_precision::<F, _>(samples.len())).sqrt())
}

/// Scales `samples` so that the peak equals `target_level`.
///
/// The gain is `target_level / peak`. An all-zero buffer has no peak to scale
/// and is left as it is.
pub fn normalize_peak<F: RealFloat>(samples: &mut [F], target_level: F) {
    let current_peak = peak(samples);
    if current_peak > F::zero() {
        let gain = target_level / current_peak;
        for sample in samples.iter_mut() {
            *sample = *sample * gain;
        }
    }
}

/// Multiplies every sample with `|x| < noise_floor` by `reduction_factor`.
///
/// This is a per-sample time-domain gate with no memory and no spectral
/// analysis. Samples at or above the floor pass unchanged. A
/// `reduction_factor` in `[0, 1)` attenuates; other values are applied as
/// given.
pub fn noise_gate<F: RealFloat>(samples: &mut [F], noise_floor: F, reduction_factor: F) {
    for sample in samples.iter_mut() {
        if sample.abs() < noise_floor {
            *sample = *sample * reduction_factor;
        }
    }
}

impl<F: RealFloat> AudioLevels<F> for [F] {
    fn peak(&self) -> F {
        peak(self)
    }

    fn rms(&self) -> KernelResult<F> {
        rms(self)
    }

    fn normalize_peak(&mut self, target_level: F) {
        normalize_peak(self, target_level)
    }

    fn noise_gate(&mut self, noise_floor: F, reduction_factor: F) {
        noise_gate(self, noise_floor, reduction_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;
    use approx_eq::assert_approx_eq;

    #[test]
    fn test_peak() {
        assert_eq!(peak(&[0.1f64, -0.8, 0.5]), 0.8);
        assert_eq!(peak::<f64>(&[]), 0.0);
    }

    #[test]
    fn test_normalize_peak() {
        let mut samples = vec![-2.0f64, 1.0, 0.5, -1.0];
        samples.normalize_peak(0.95);

        assert_approx_eq!(samples.peak(), 0.95, 1e-12);
        assert_approx_eq!(samples[0], -0.95, 1e-12);
        assert_approx_eq!(samples[1], 0.475, 1e-12);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut samples = vec![0.3f64, -0.6, 0.2];
        samples.normalize_peak(0.6);
        assert_eq!(samples, vec![0.3, -0.6, 0.2]);

        let mut once = vec![0.1f64, -0.4, 0.25, 0.05];
        once.normalize_peak(0.9);
        let mut twice = once.clone();
        twice.normalize_peak(0.9);
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).abs() < 1e-15);
        }
    }

    #[test]
    fn test_normalize_silence_is_noop() {
        let mut silence = vec![0.0f64; 16];
        silence.normalize_peak(0.95);
        assert_eq!(silence, vec![0.0; 16]);

        let mut empty: Vec<f64> = Vec::new();
        empty.normalize_peak(0.95);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rms() {
        let samples = [1.0f64, -1.0, 1.0, -1.0];
        assert_eq!(samples.rms().unwrap(), 1.0);

        let sine: Vec<f64> = (0..1000)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 100.0).sin())
            .collect();
        assert_approx_eq!(sine.rms().unwrap(), std::f64::consts::FRAC_1_SQRT_2, 1e-9);
    }

    #[test]
    fn test_rms_scaling() {
        let samples = [0.1f64, -0.3, 0.25, 0.7, -0.05];
        let base = rms(&samples).unwrap();
        for k in [2.0f64, -0.5, 3.25] {
            let scaled: Vec<f64> = samples.iter().map(|x| x * k).collect();
            assert_approx_eq!(rms(&scaled).unwrap(), k.abs() * base, 1e-12);
        }
    }

    #[test]
    fn test_rms_empty_is_error() {
        let err = rms::<f64>(&[]).unwrap_err();
        assert_eq!(err.status(), StatusCode::InvalidInput);
    }

    #[test]
    fn test_noise_gate() {
        let mut samples = vec![0.005f64, -0.009, 0.01, -0.5, 0.0];
        samples.noise_gate(0.01, 0.5);
        assert_eq!(samples, vec![0.0025, -0.0045, 0.01, -0.5, 0.0]);
    }

    #[test]
    fn test_noise_gate_full_mute() {
        let mut samples = vec![0.02f32, -0.2, 0.05];
        noise_gate(&mut samples, 0.1, 0.0);
        assert_eq!(samples, vec![0.0, -0.2, 0.0]);
    }
}
