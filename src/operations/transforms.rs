//! Transform engine and spectral front-end.
//!
//! The engine is an iterative radix-2 decimation-in-time Cooley-Tukey FFT
//! that works in place on power-of-two complex buffers. The front-end
//! zero-pads arbitrary-length real buffers for it.
//!
//! The truncating front-end functions ([`spectrum`], [`spectrum_into`]) keep
//! only the first `len` bins of the padded transform, which is what existing
//! hosts of the C boundary expect. [`full_spectrum`] keeps every bin and is
//! the exact inverse of [`inverse_spectrum`].

use super::traits::AudioTransforms;
use super::types::{FftDirection, Spectrum};
use crate::utils::{is_transform_length, transform_size, try_filled};
use crate::{KernelResult, ParameterError, RealFloat, to_precision};
use num_complex::Complex;

// =============================================================================
// TRANSFORM ENGINE
// =============================================================================

/// Runs the transform engine over `data` in place.
///
/// Lengths 0 and 1 are returned unchanged. Any other length must be a power
/// of two; otherwise the call fails before touching `data`.
///
/// # Errors
/// Returns an invalid-value error for non-power-of-two lengths.
pub fn transform<F: RealFloat>(data: &mut [Complex<F>], direction: FftDirection) -> KernelResult<()> {
    let n = data.len();
    if !is_transform_length(n) {
        return Err(ParameterError::invalid_value(
            "length",
            format!("transform length must be a power of two, got {n}"),
        )
        .into());
    }
    if n <= 1 {
        return Ok(());
    }

    bit_reverse_permute(data);
    butterfly_stages(data, direction);

    if direction.is_inverse() {
        let scale: F = to_precision(n);
        for value in data.iter_mut() {
            *value = value.unscale(scale);
        }
    }
    Ok(())
}

/// Forward FFT in place. See [`transform`].
pub fn fft_in_place<F: RealFloat>(data: &mut [Complex<F>]) -> KernelResult<()> {
    transform(data, FftDirection::Forward)
}

/// Inverse FFT in place, including the `1/N` scale. See [`transform`].
pub fn ifft_in_place<F: RealFloat>(data: &mut [Complex<F>]) -> KernelResult<()> {
    transform(data, FftDirection::Inverse)
}

/// Runs the transform engine over a buffer held as parallel component arrays.
///
/// `real` and `imag` are overwritten with the transformed values.
///
/// # Errors
/// Returns an invalid-value error if the arrays differ in length or the length
/// is not a transform length, and an allocation error if the complex working
/// array cannot be reserved. The arrays are untouched on error.
pub fn transform_parts<F: RealFloat>(
    real: &mut [F],
    imag: &mut [F],
    direction: FftDirection,
) -> KernelResult<()> {
    if real.len() != imag.len() {
        return Err(ParameterError::invalid_value(
            "imag",
            format!(
                "component lengths differ: {} real, {} imaginary",
                real.len(),
                imag.len()
            ),
        )
        .into());
    }

    let zero = Complex::new(F::zero(), F::zero());
    let mut buffer = try_filled(real.len(), zero, "split transform working array")?;
    for ((slot, &re), &im) in buffer.iter_mut().zip(real.iter()).zip(imag.iter()) {
        *slot = Complex::new(re, im);
    }
    transform(&mut buffer, direction)?;

    for ((value, re), im) in buffer.iter().zip(real.iter_mut()).zip(imag.iter_mut()) {
        *re = value.re;
        *im = value.im;
    }
    Ok(())
}

/// Reorders `data` so index `i` holds the sample from bit-reversed `i`.
///
/// `j` tracks the bit reversal of `i` as a counter incremented from the top
/// bit down: clear set bits until a clear one is found, then set it.
fn bit_reverse_permute<T>(data: &mut [T]) {
    let n = data.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            data.swap(i, j);
        }
    }
}

fn butterfly_stages<F: RealFloat>(data: &mut [Complex<F>], direction: FftDirection) {
    let n = data.len();
    let two_pi = to_precision::<F, _>(2.0) * F::PI();

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let angle = two_pi / to_precision::<F, _>(len) * direction.sign::<F>();
        let w_len = Complex::new(angle.cos(), angle.sin());

        for block in data.chunks_exact_mut(len) {
            let (lower, upper) = block.split_at_mut(half);
            // Twiddles come from the running product, no per-sample trig.
            let mut w = Complex::new(F::one(), F::zero());
            for (a, b) in lower.iter_mut().zip(upper.iter_mut()) {
                let u = *a;
                let v = *b * w;
                *a = u + v;
                *b = u - v;
                w = w * w_len;
            }
        }
        len <<= 1;
    }
}

// =============================================================================
// SPECTRAL FRONT-END
// =============================================================================

/// Zero-pads `input` to the next power of two and transforms it forward.
fn padded_forward<F: RealFloat>(input: &[F]) -> KernelResult<Vec<Complex<F>>> {
    let size = transform_size(input.len())?;
    tracing::trace!(input_len = input.len(), padded_len = size, "zero-padding for forward transform");

    let zero = Complex::new(F::zero(), F::zero());
    let mut buffer = try_filled(size, zero, "spectrum working array")?;
    for (slot, &sample) in buffer.iter_mut().zip(input) {
        *slot = Complex::new(sample, F::zero());
    }

    transform(&mut buffer, FftDirection::Forward)?;
    Ok(buffer)
}

/// Computes the forward spectrum of `input`, truncated to `input.len()` bins.
///
/// The buffer is padded to `P`, the smallest power of two not below its
/// length, and the `P - len` bins past the input length are discarded.
///
/// # Examples
/// ```rust
/// use pcm_kernel::spectrum;
///
/// let spectrum = spectrum(&[1.0f64, 1.0, 1.0]).unwrap();
/// assert_eq!(spectrum.len(), 3);
/// assert_eq!(spectrum.real[0], 3.0);
/// ```
pub fn spectrum<F: RealFloat>(input: &[F]) -> KernelResult<Spectrum<F>> {
    let buffer = padded_forward(input)?;
    Ok(Spectrum::from_complex(&buffer, input.len()))
}

/// Computes the forward spectrum of the zero-padded `input`, keeping all `P` bins.
///
/// An empty input yields a single zero bin.
pub fn full_spectrum<F: RealFloat>(input: &[F]) -> KernelResult<Spectrum<F>> {
    let buffer = padded_forward(input)?;
    Ok(Spectrum::from_complex(&buffer, buffer.len()))
}

/// Writes the truncated forward spectrum of `input` into caller-owned arrays.
///
/// Exactly `input.len()` values are written to each output; anything past
/// that is left as it was.
///
/// # Errors
/// Returns an invalid-value error, without writing, if either output holds
/// fewer than `input.len()` values.
pub fn spectrum_into<F: RealFloat>(
    input: &[F],
    out_real: &mut [F],
    out_imag: &mut [F],
) -> KernelResult<()> {
    let len = input.len();
    if out_real.len() < len || out_imag.len() < len {
        return Err(ParameterError::invalid_value(
            "output",
            format!(
                "spectrum outputs must hold {len} bins, got {} real and {} imaginary",
                out_real.len(),
                out_imag.len()
            ),
        )
        .into());
    }

    let buffer = padded_forward(input)?;
    for ((value, re), im) in buffer.iter().take(len).zip(out_real.iter_mut()).zip(out_imag.iter_mut()) {
        *re = value.re;
        *im = value.im;
    }
    Ok(())
}

/// Reconstructs a real buffer from a full spectrum.
///
/// Runs the inverse transform on `real + i·imag` and returns the real parts.
/// Together with [`full_spectrum`] this round-trips a buffer padded to its
/// transform size.
///
/// # Errors
/// Returns an invalid-value error if the component arrays differ in length or
/// the length is not a transform length (0, 1 or a power of two).
pub fn inverse_spectrum<F: RealFloat>(real: &[F], imag: &[F]) -> KernelResult<Vec<F>> {
    if real.len() != imag.len() {
        return Err(ParameterError::invalid_value(
            "imag",
            format!(
                "component lengths differ: {} real, {} imaginary",
                real.len(),
                imag.len()
            ),
        )
        .into());
    }
    if !is_transform_length(real.len()) {
        return Err(ParameterError::invalid_value(
            "length",
            format!("spectrum length must be a power of two, got {}", real.len()),
        )
        .into());
    }

    let zero = Complex::new(F::zero(), F::zero());
    let mut buffer = try_filled(real.len(), zero, "inverse spectrum working array")?;
    for ((slot, &re), &im) in buffer.iter_mut().zip(real).zip(imag) {
        *slot = Complex::new(re, im);
    }
    transform(&mut buffer, FftDirection::Inverse)?;
    Ok(buffer.iter().map(|value| value.re).collect())
}

impl<F: RealFloat> AudioTransforms<F> for [F] {
    fn spectrum(&self) -> KernelResult<Spectrum<F>> {
        spectrum(self)
    }

    fn full_spectrum(&self) -> KernelResult<Spectrum<F>> {
        full_spectrum(self)
    }

    fn spectrum_into(&self, out_real: &mut [F], out_imag: &mut [F]) -> KernelResult<()> {
        spectrum_into(self, out_real, out_imag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KernelError, StatusCode};
    use approx_eq::assert_approx_eq;

    /// Deterministic pseudo-random samples in [-1, 1).
    fn noise(len: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
            })
            .collect()
    }

    fn to_complex(samples: &[f64]) -> Vec<Complex<f64>> {
        samples.iter().map(|&x| Complex::new(x, 0.0)).collect()
    }

    fn assert_complex_close(actual: &[Complex<f64>], expected: &[Complex<f64>], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (k, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).norm() < tol, "bin {k}: {a} vs {e}");
        }
    }

    #[test]
    fn test_matches_reference_fft() {
        for n in [2usize, 4, 8, 64, 1024] {
            let mut ours = to_complex(&noise(n, n as u64));
            let mut reference = ours.clone();

            fft_in_place(&mut ours).unwrap();
            let mut planner = rustfft::FftPlanner::<f64>::new();
            planner.plan_fft_forward(n).process(&mut reference);

            assert_complex_close(&ours, &reference, 1e-9 * n as f64);
        }
    }

    #[test]
    fn test_inverse_matches_reference() {
        let n = 256;
        let mut ours = to_complex(&noise(n, 7));
        let mut reference = ours.clone();

        ifft_in_place(&mut ours).unwrap();
        let mut planner = rustfft::FftPlanner::<f64>::new();
        planner.plan_fft_inverse(n).process(&mut reference);
        // rustfft leaves the inverse unnormalized
        for value in reference.iter_mut() {
            *value /= n as f64;
        }

        assert_complex_close(&ours, &reference, 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let original = to_complex(&noise(512, 42));
        let mut data = original.clone();

        fft_in_place(&mut data).unwrap();
        ifft_in_place(&mut data).unwrap();

        assert_complex_close(&data, &original, 1e-9);
    }

    #[test]
    fn test_linearity() {
        let n = 128;
        let x = noise(n, 1);
        let y = noise(n, 2);
        let (a, b) = (0.75, -1.5);

        let mut fx = to_complex(&x);
        let mut fy = to_complex(&y);
        let combined: Vec<f64> = x.iter().zip(&y).map(|(xi, yi)| a * xi + b * yi).collect();
        let mut f_combined = to_complex(&combined);

        fft_in_place(&mut fx).unwrap();
        fft_in_place(&mut fy).unwrap();
        fft_in_place(&mut f_combined).unwrap();

        let expected: Vec<Complex<f64>> = fx.iter().zip(&fy).map(|(u, v)| u * a + v * b).collect();
        assert_complex_close(&f_combined, &expected, 1e-9);
    }

    #[test]
    fn test_degenerate_lengths() {
        let mut empty: Vec<Complex<f64>> = Vec::new();
        fft_in_place(&mut empty).unwrap();
        assert!(empty.is_empty());

        let mut single = vec![Complex::new(0.3f64, -0.1)];
        fft_in_place(&mut single).unwrap();
        assert_eq!(single, vec![Complex::new(0.3, -0.1)]);
        ifft_in_place(&mut single).unwrap();
        assert_eq!(single, vec![Complex::new(0.3, -0.1)]);
    }

    #[test]
    fn test_non_power_of_two_rejected_untouched() {
        let original = to_complex(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut data = original.clone();

        let err = fft_in_place(&mut data).unwrap_err();
        assert!(matches!(err, KernelError::Parameter(_)));
        assert_eq!(err.status(), StatusCode::InvalidInput);
        assert_eq!(data, original);
    }

    #[test]
    fn test_quarter_rate_sinusoid() {
        let samples = [0.0f64, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
        let magnitudes = spectrum(&samples).unwrap().magnitudes();

        assert_eq!(magnitudes.len(), 8);
        assert_approx_eq!(magnitudes[2], 4.0, 1e-12);
        assert_approx_eq!(magnitudes[6], 4.0, 1e-12);
        for (k, &m) in magnitudes.iter().enumerate() {
            if k != 2 && k != 6 {
                assert!(m * 10.0 < magnitudes[2], "bin {k} has magnitude {m}");
            }
        }
    }

    #[test]
    fn test_spectrum_truncates_padded_bins() {
        let samples = noise(5, 3);
        let truncated = spectrum(&samples).unwrap();
        let full = full_spectrum(&samples).unwrap();

        assert_eq!(truncated.len(), 5);
        assert_eq!(full.len(), 8);
        assert_eq!(truncated.real[..], full.real[..5]);
        assert_eq!(truncated.imag[..], full.imag[..5]);
    }

    #[test]
    fn test_spectrum_of_empty_input() {
        let empty: [f64; 0] = [];
        assert!(spectrum(&empty).unwrap().is_empty());

        let full = full_spectrum(&empty).unwrap();
        assert_eq!(full.real, vec![0.0]);
        assert_eq!(full.imag, vec![0.0]);
    }

    #[test]
    fn test_spectrum_into() {
        let samples = noise(6, 9);
        let expected = spectrum(&samples).unwrap();

        let mut real = vec![f64::NAN; 7];
        let mut imag = vec![f64::NAN; 7];
        samples.spectrum_into(&mut real, &mut imag).unwrap();

        assert_eq!(real[..6], expected.real[..]);
        assert_eq!(imag[..6], expected.imag[..]);
        // Only `len` bins are written
        assert!(real[6].is_nan() && imag[6].is_nan());
    }

    #[test]
    fn test_spectrum_into_short_output() {
        let samples = [0.1f64, 0.2, 0.3, 0.4];
        let mut real = vec![9.0; 4];
        let mut imag = vec![9.0; 3];

        let err = spectrum_into(&samples, &mut real, &mut imag).unwrap_err();
        assert_eq!(err.status(), StatusCode::InvalidInput);
        assert_eq!(real, vec![9.0; 4]);
        assert_eq!(imag, vec![9.0; 3]);
    }

    #[test]
    fn test_inverse_spectrum_round_trip() {
        let samples = noise(11, 5);
        let full = samples.full_spectrum().unwrap();
        let restored = inverse_spectrum(&full.real, &full.imag).unwrap();

        assert_eq!(restored.len(), 16);
        for (i, value) in restored.iter().enumerate() {
            let expected = samples.get(i).copied().unwrap_or(0.0);
            assert!((value - expected).abs() < 1e-12, "sample {i}: {value} vs {expected}");
        }
    }

    #[test]
    fn test_inverse_spectrum_validation() {
        assert!(inverse_spectrum(&[1.0f64, 0.0], &[0.0]).is_err());
        assert!(inverse_spectrum(&[1.0f64, 0.0, 0.0], &[0.0, 0.0, 0.0]).is_err());
        assert!(inverse_spectrum::<f64>(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_transform_parts_matches_complex() {
        let samples = noise(32, 11);
        let mut expected = to_complex(&samples);
        fft_in_place(&mut expected).unwrap();

        let mut real = samples.clone();
        let mut imag = vec![0.0; 32];
        transform_parts(&mut real, &mut imag, FftDirection::Forward).unwrap();
        for (k, value) in expected.iter().enumerate() {
            assert_eq!(real[k], value.re);
            assert_eq!(imag[k], value.im);
        }

        transform_parts(&mut real, &mut imag, FftDirection::Inverse).unwrap();
        for (restored, original) in real.iter().zip(&samples) {
            assert!((restored - original).abs() < 1e-12);
        }
        assert!(imag.iter().all(|x| x.abs() < 1e-12));
    }

    #[test]
    fn test_transform_parts_validation() {
        let mut real = vec![1.0f64, 2.0, 3.0];
        let mut imag = vec![0.0f64; 3];
        assert!(transform_parts(&mut real, &mut imag, FftDirection::Forward).is_err());
        assert_eq!(real, vec![1.0, 2.0, 3.0]);

        let mut short = vec![0.0f64; 2];
        assert!(transform_parts(&mut real, &mut short, FftDirection::Inverse).is_err());
    }

    #[test]
    fn test_single_precision() {
        let samples = [0.0f32, 1.0, 0.0, -1.0];
        let spectrum = samples.spectrum().unwrap();
        let magnitudes = spectrum.magnitudes();
        assert!((magnitudes[1] - 2.0).abs() < 1e-5);
        assert!(magnitudes[0].abs() < 1e-5);
        assert!(magnitudes[2].abs() < 1e-5);
    }
}
