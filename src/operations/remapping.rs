//! Resampling-based tempo change and pitch shift.
//!
//! Both operations read the input at fractional positions and linearly
//! interpolate between neighbouring samples. Tempo change produces a new
//! buffer of `floor(len / tempo_factor)` samples. Pitch shift rewrites the
//! caller's buffer at the same length, padding with silence where the read
//! position runs past the end.

use super::traits::AudioRemapping;
use super::types::is_positive_finite;
use crate::utils::{semitones_to_ratio, try_filled, try_snapshot};
use crate::{KernelResult, ParameterError, RealFloat, to_precision};

/// Smallest pitch ratio accepted by [`pitch_shift`] (two octaves down).
pub const MIN_PITCH_RATIO: f64 = 0.25;

/// Largest pitch ratio accepted by [`pitch_shift`] (two octaves up).
pub const MAX_PITCH_RATIO: f64 = 4.0;

// =============================================================================
// TEMPO
// =============================================================================

fn validate_tempo_factor<F: RealFloat>(tempo_factor: F) -> KernelResult<()> {
    if is_positive_finite(tempo_factor) {
        Ok(())
    } else {
        Err(ParameterError::invalid_value(
            "tempo_factor",
            format!("must be finite and > 0, got {tempo_factor:?}"),
        )
        .into())
    }
}

/// Number of samples a tempo change of `len` samples produces: `floor(len / tempo_factor)`.
///
/// # Errors
/// Returns an invalid-value error if `tempo_factor` is not finite and
/// positive, or if the result does not fit in `usize`.
pub fn tempo_output_len<F: RealFloat>(len: usize, tempo_factor: F) -> KernelResult<usize> {
    validate_tempo_factor(tempo_factor)?;
    (to_precision::<F, _>(len) / tempo_factor)
        .floor()
        .to_usize()
        .ok_or_else(|| {
            ParameterError::invalid_value(
                "tempo_factor",
                format!("{len} samples at factor {tempo_factor:?} overflow the output length"),
            )
            .into()
        })
}

/// Fills `output` by reading `input` at positions `i · tempo_factor`.
///
/// `output.len()` must not exceed `floor(input.len() / tempo_factor)`, which
/// guarantees a non-empty input whenever there is anything to write.
fn resample_linear<F: RealFloat>(input: &[F], tempo_factor: F, output: &mut [F]) {
    let Some(last) = input.len().checked_sub(1) else {
        return;
    };
    for (i, out) in output.iter_mut().enumerate() {
        let src_index = to_precision::<F, _>(i) * tempo_factor;
        let index1 = src_index.floor().to_usize().map_or(last, |index| index.min(last));
        let index2 = (index1 + 1).min(last);
        let fraction = src_index - to_precision::<F, _>(index1);

        *out = input[index1] * (F::one() - fraction) + input[index2] * fraction;
    }
}

/// Changes tempo by resampling `input` into a caller-owned `output`.
///
/// Writes `floor(input.len() / tempo_factor)` samples to the front of
/// `output` and returns that count. A factor above one speeds up (shorter
/// output), below one slows down. Pitch moves with the tempo.
///
/// # Errors
/// Returns an invalid-value error, without writing, if `tempo_factor` is not
/// finite and positive or `output` is shorter than the required length.
pub fn tempo_change_into<F: RealFloat>(
    input: &[F],
    tempo_factor: F,
    output: &mut [F],
) -> KernelResult<usize> {
    let new_len = tempo_output_len(input.len(), tempo_factor)?;
    if output.len() < new_len {
        return Err(ParameterError::invalid_value(
            "output",
            format!(
                "tempo change needs room for {new_len} samples, got {}",
                output.len()
            ),
        )
        .into());
    }

    resample_linear(input, tempo_factor, &mut output[..new_len]);
    Ok(new_len)
}

/// Changes tempo by resampling `input` into a newly allocated buffer.
///
/// # Errors
/// Returns an invalid-value error for a bad `tempo_factor`, or an allocation
/// error if the output cannot be reserved.
///
/// # Examples
/// ```rust
/// use pcm_kernel::tempo_change;
///
/// let slower = tempo_change(&[0.0f64, 1.0, 0.0, -1.0], 0.5).unwrap();
/// assert_eq!(slower, vec![0.0, 0.5, 1.0, 0.5, 0.0, -0.5, -1.0, -1.0]);
/// ```
pub fn tempo_change<F: RealFloat>(input: &[F], tempo_factor: F) -> KernelResult<Vec<F>> {
    let new_len = tempo_output_len(input.len(), tempo_factor)?;
    let mut output = try_filled(new_len, F::zero(), "tempo change output")?;
    resample_linear(input, tempo_factor, &mut output);
    Ok(output)
}

// =============================================================================
// PITCH
// =============================================================================

/// Shifts the pitch of `samples` by `semitones`, in place and at fixed length.
///
/// The ratio `2^(semitones / 12)` must lie in
/// [[`MIN_PITCH_RATIO`], [`MAX_PITCH_RATIO`]], i.e. roughly ±24 semitones.
/// Output sample `i` reads the original at `i / ratio`; positions at or past
/// the last sample become silence, others are linearly interpolated and
/// clamped to `[-1, 1]`. A zero shift leaves the buffer exactly as it was.
///
/// `sample_rate` is validated but does not affect the result, which depends
/// only on index ratios.
///
/// # Errors
/// - Invalid value: empty buffer, or `sample_rate` not finite and positive.
/// - Out of range: the pitch ratio falls outside the supported window
///   (non-finite `semitones` included).
/// - Allocation: the working snapshot could not be reserved.
///
/// `samples` is left untouched on every error.
pub fn pitch_shift<F: RealFloat>(samples: &mut [F], sample_rate: F, semitones: F) -> KernelResult<()> {
    if samples.is_empty() {
        return Err(ParameterError::invalid_value("samples", "cannot pitch-shift an empty buffer").into());
    }
    if !is_positive_finite(sample_rate) {
        return Err(ParameterError::invalid_value(
            "sample_rate",
            format!("must be finite and > 0, got {sample_rate:?}"),
        )
        .into());
    }
    if semitones == F::zero() {
        return Ok(());
    }

    let ratio = semitones_to_ratio(semitones);
    let min_ratio = to_precision::<F, _>(MIN_PITCH_RATIO);
    let max_ratio = to_precision::<F, _>(MAX_PITCH_RATIO);
    if !(min_ratio..=max_ratio).contains(&ratio) {
        let value = ratio.to_f64().unwrap_or(f64::NAN);
        tracing::trace!(semitones = ?semitones, ratio = value, "rejecting extreme pitch shift");
        return Err(
            ParameterError::out_of_range("pitch_ratio", value, MIN_PITCH_RATIO, MAX_PITCH_RATIO)
                .into(),
        );
    }

    // Output overwrites the input, so read from a copy.
    let snapshot = try_snapshot(samples, "pitch shift snapshot")?;
    let last = snapshot.len() - 1;
    let last_position = to_precision::<F, _>(last);
    let one = F::one();

    for (i, out) in samples.iter_mut().enumerate() {
        let src_index = to_precision::<F, _>(i) / ratio;
        *out = if src_index >= last_position || src_index < F::zero() {
            F::zero()
        } else {
            let index1 = src_index.floor().to_usize().map_or(0, |index| index.min(last));
            let index2 = (index1 + 1).min(last);
            let fraction = src_index - to_precision::<F, _>(index1);
            let value = snapshot[index1] * (one - fraction) + snapshot[index2] * fraction;

            if value > one {
                one
            } else if value < -one {
                -one
            } else {
                value
            }
        };
    }
    Ok(())
}

impl<F: RealFloat> AudioRemapping<F> for [F] {
    fn tempo_change(&self, tempo_factor: F) -> KernelResult<Vec<F>> {
        tempo_change(self, tempo_factor)
    }

    fn pitch_shift(&mut self, sample_rate: F, semitones: F) -> KernelResult<()> {
        pitch_shift(self, sample_rate, semitones)
    }
}
