//! C ABI entry points.
//!
//! Every function takes raw `double` buffers plus an `int` length and returns
//! an `int` status ([`StatusCode`]): `0` on success, a negative code per
//! failure kind otherwise. [`pcm_kernel_rms`] returns the level directly and
//! uses `-1.0` as its failure sentinel.
//!
//! Nothing escapes the boundary: kernel errors become status codes and panics
//! are caught and reported as [`StatusCode::Unclassified`]. Null pointers and
//! negative lengths are rejected as invalid input before any buffer is read.
//!
//! All buffers stay owned by the caller. Each must be valid for the stated
//! length and must not be accessed by another thread during the call.

use std::ffi::{c_char, c_double, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::slice;

use crate::operations::types::FftDirection;
use crate::{
    KernelResult, ParameterError, StatusCode, highpass, lowpass, noise_gate, normalize_peak,
    pitch_shift, rms, spectrum_into, tempo_change_into, tempo_output_len, transform_parts,
};

/// Value returned by [`pcm_kernel_rms`] on failure. RMS is never negative.
pub const RMS_FAILURE: c_double = -1.0;

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

// =============================================================================
// BOUNDARY HELPERS
// =============================================================================

/// Runs `call`, converting errors and panics into status codes.
fn guarded<T>(operation: &'static str, call: impl FnOnce() -> KernelResult<T>) -> Result<T, StatusCode> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            let status = error.status();
            tracing::debug!(operation, code = status.code(), %error, "kernel call rejected");
            Err(status)
        }
        Err(_) => {
            tracing::error!(operation, "kernel call panicked");
            Err(StatusCode::Unclassified)
        }
    }
}

fn to_status(result: Result<(), StatusCode>) -> c_int {
    match result {
        Ok(()) => StatusCode::Success.code(),
        Err(status) => status.code(),
    }
}

fn checked_len(length: c_int) -> KernelResult<usize> {
    usize::try_from(length).map_err(|_| {
        ParameterError::invalid_value("length", format!("must be >= 0, got {length}")).into()
    })
}

fn checked_ptr<T>(ptr: *const T, name: &'static str) -> KernelResult<()> {
    if ptr.is_null() {
        Err(ParameterError::invalid_value(name, "null pointer").into())
    } else {
        Ok(())
    }
}

/// # Safety
/// `ptr` must be null or valid for reads of `len` values for `'a`.
unsafe fn input_slice<'a>(ptr: *const c_double, len: usize, name: &'static str) -> KernelResult<&'a [c_double]> {
    checked_ptr(ptr, name)?;
    // SAFETY: non-null, and the caller guarantees `len` readable values.
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// # Safety
/// `ptr` must be null or valid for reads and writes of `len` values for
/// `'a`, with no other live reference to that memory.
unsafe fn output_slice<'a>(ptr: *mut c_double, len: usize, name: &'static str) -> KernelResult<&'a mut [c_double]> {
    checked_ptr(ptr, name)?;
    // SAFETY: non-null, and the caller guarantees `len` exclusive values.
    Ok(unsafe { slice::from_raw_parts_mut(ptr, len) })
}

fn to_c_len(len: usize) -> KernelResult<c_int> {
    c_int::try_from(len).map_err(|_| {
        ParameterError::invalid_value("length", format!("{len} samples exceed the C int range")).into()
    })
}

// =============================================================================
// SPECTRAL
// =============================================================================

/// Forward spectrum of `input`, truncated to `length` bins.
///
/// The input is zero-padded to the next power of two; only the first
/// `length` real and imaginary components are written.
///
/// # Safety
/// `input`, `out_real` and `out_imag` must each be valid for `length`
/// doubles, and the outputs must not overlap each other or `input`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_fft(
    input: *const c_double,
    length: c_int,
    out_real: *mut c_double,
    out_imag: *mut c_double,
) -> c_int {
    to_status(guarded("fft", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let (input, out_real, out_imag) = unsafe {
            (
                input_slice(input, len, "input")?,
                output_slice(out_real, len, "out_real")?,
                output_slice(out_imag, len, "out_imag")?,
            )
        };
        spectrum_into(input, out_real, out_imag)
    }))
}

/// In-place inverse transform of a spectrum held as two arrays.
///
/// `length` must be 0, 1 or a power of two.
///
/// # Safety
/// `real` and `imag` must each be valid for `length` doubles and must not
/// overlap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_ifft(real: *mut c_double, imag: *mut c_double, length: c_int) -> c_int {
    to_status(guarded("ifft", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let (real, imag) = unsafe { (output_slice(real, len, "real")?, output_slice(imag, len, "imag")?) };
        transform_parts(real, imag, FftDirection::Inverse)
    }))
}

// =============================================================================
// FILTERS AND LEVELS
// =============================================================================

/// One-pole low-pass filter, in place.
///
/// # Safety
/// `data` must be valid for reads and writes of `length` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_lowpass(
    data: *mut c_double,
    length: c_int,
    cutoff_freq: c_double,
    sample_rate: c_double,
) -> c_int {
    to_status(guarded("lowpass", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let data = unsafe { output_slice(data, len, "data")? };
        lowpass(data, cutoff_freq, sample_rate)
    }))
}

/// One-pole high-pass filter, in place.
///
/// # Safety
/// `data` must be valid for reads and writes of `length` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_highpass(
    data: *mut c_double,
    length: c_int,
    cutoff_freq: c_double,
    sample_rate: c_double,
) -> c_int {
    to_status(guarded("highpass", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let data = unsafe { output_slice(data, len, "data")? };
        highpass(data, cutoff_freq, sample_rate)
    }))
}

/// Time-domain noise gate, in place.
///
/// # Safety
/// `data` must be valid for reads and writes of `length` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_noise_gate(
    data: *mut c_double,
    length: c_int,
    noise_floor: c_double,
    reduction_factor: c_double,
) -> c_int {
    to_status(guarded("noise_gate", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let data = unsafe { output_slice(data, len, "data")? };
        noise_gate(data, noise_floor, reduction_factor);
        Ok(())
    }))
}

/// Peak normalization to `target_level`, in place.
///
/// # Safety
/// `data` must be valid for reads and writes of `length` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_normalize(data: *mut c_double, length: c_int, target_level: c_double) -> c_int {
    to_status(guarded("normalize", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let data = unsafe { output_slice(data, len, "data")? };
        normalize_peak(data, target_level);
        Ok(())
    }))
}

/// RMS level of `data`, or [`RMS_FAILURE`] on any failure (including an empty buffer).
///
/// # Safety
/// `data` must be valid for reads of `length` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_rms(data: *const c_double, length: c_int) -> c_double {
    guarded("rms", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let data = unsafe { input_slice(data, len, "data")? };
        rms(data)
    })
    .unwrap_or(RMS_FAILURE)
}

// =============================================================================
// REMAPPING
// =============================================================================

/// Output length a tempo change of `length` samples needs, or a negative status.
#[unsafe(no_mangle)]
pub extern "C" fn pcm_kernel_tempo_length(length: c_int, tempo_factor: c_double) -> c_int {
    guarded("tempo_length", || {
        let len = checked_len(length)?;
        to_c_len(tempo_output_len(len, tempo_factor)?)
    })
    .unwrap_or_else(StatusCode::code)
}

/// Tempo change of `input` into `output`.
///
/// On success writes `floor(length / tempo_factor)` samples to `output` and
/// stores that count in `out_length`. `output_capacity` is the number of
/// doubles `output` can hold; a smaller capacity than required is rejected
/// without writing.
///
/// # Safety
/// `input` must be valid for `length` doubles, `output` for
/// `output_capacity` doubles, and `out_length` for one `int`. `output` must
/// not overlap `input`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_tempo_change(
    input: *const c_double,
    length: c_int,
    tempo_factor: c_double,
    output: *mut c_double,
    output_capacity: c_int,
    out_length: *mut c_int,
) -> c_int {
    to_status(guarded("tempo_change", || {
        let len = checked_len(length)?;
        let capacity = checked_len(output_capacity)?;
        checked_ptr(out_length, "out_length")?;
        let new_len = to_c_len(tempo_output_len(len, tempo_factor)?)?;

        // SAFETY: upheld by the caller per the function contract.
        let (input, output) = unsafe { (input_slice(input, len, "input")?, output_slice(output, capacity, "output")?) };
        tempo_change_into(input, tempo_factor, output)?;

        // SAFETY: checked non-null above; the caller guarantees it is writable.
        unsafe { out_length.write(new_len) };
        Ok(())
    }))
}

/// Pitch shift by `semitones`, in place and at fixed length.
///
/// Returns [`StatusCode::OutOfRange`] (`-2`) when the pitch ratio is outside
/// `[0.25, 4.0]`; the buffer is untouched in that case.
///
/// # Safety
/// `samples` must be valid for reads and writes of `length` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pcm_kernel_pitch_shift(
    samples: *mut c_double,
    length: c_int,
    sample_rate: c_int,
    semitones: c_double,
) -> c_int {
    to_status(guarded("pitch_shift", || {
        let len = checked_len(length)?;
        // SAFETY: upheld by the caller per the function contract.
        let samples = unsafe { output_slice(samples, len, "samples")? };
        pitch_shift(samples, c_double::from(sample_rate), semitones)
    }))
}

/// NUL-terminated crate version string with static lifetime.
#[unsafe(no_mangle)]
pub extern "C" fn pcm_kernel_version() -> *const c_char {
    VERSION.as_ptr().cast()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{spectrum, tempo_change};
    use std::ffi::CStr;
    use std::ptr;

    const OK: c_int = 0;

    fn len_of(samples: &[f64]) -> c_int {
        c_int::try_from(samples.len()).unwrap()
    }

    #[test]
    fn test_fft_matches_rust_api() {
        let input = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0];
        let mut real = vec![0.0; 6];
        let mut imag = vec![0.0; 6];

        let status = unsafe { pcm_kernel_fft(input.as_ptr(), len_of(&input), real.as_mut_ptr(), imag.as_mut_ptr()) };
        assert_eq!(status, OK);

        let expected = spectrum(&input).unwrap();
        assert_eq!(real, expected.real);
        assert_eq!(imag, expected.imag);
    }

    #[test]
    fn test_ifft_round_trip() {
        let input = [0.25, -0.5, 0.75, 0.0];
        let mut real = vec![0.0; 4];
        let mut imag = vec![0.0; 4];

        unsafe {
            assert_eq!(pcm_kernel_fft(input.as_ptr(), 4, real.as_mut_ptr(), imag.as_mut_ptr()), OK);
            assert_eq!(pcm_kernel_ifft(real.as_mut_ptr(), imag.as_mut_ptr(), 4), OK);
        }
        for (restored, original) in real.iter().zip(&input) {
            assert!((restored - original).abs() < 1e-12);
        }

        let mut odd = vec![1.0; 3];
        let mut odd_imag = vec![0.0; 3];
        let status = unsafe { pcm_kernel_ifft(odd.as_mut_ptr(), odd_imag.as_mut_ptr(), 3) };
        assert_eq!(status, StatusCode::InvalidInput.code());
    }

    #[test]
    fn test_in_place_operations() {
        let mut samples = vec![0.005, -0.5, 0.25, -1.0];
        let len = len_of(&samples);
        unsafe {
            assert_eq!(pcm_kernel_noise_gate(samples.as_mut_ptr(), len, 0.01, 0.5), OK);
            assert_eq!(samples[0], 0.0025);

            assert_eq!(pcm_kernel_normalize(samples.as_mut_ptr(), len, 0.5), OK);
            assert_eq!(samples[3], -0.5);

            assert_eq!(pcm_kernel_lowpass(samples.as_mut_ptr(), len, 8000.0, 44100.0), OK);
            assert_eq!(pcm_kernel_highpass(samples.as_mut_ptr(), len, 80.0, 44100.0), OK);
            assert_eq!(pcm_kernel_pitch_shift(samples.as_mut_ptr(), len, 44100, 0.0), OK);
        }
    }

    #[test]
    fn test_null_and_negative_length_rejected() {
        let invalid = StatusCode::InvalidInput.code();
        let mut samples = vec![0.1, 0.2];
        unsafe {
            assert_eq!(pcm_kernel_lowpass(ptr::null_mut(), 2, 1000.0, 44100.0), invalid);
            assert_eq!(pcm_kernel_highpass(samples.as_mut_ptr(), -1, 1000.0, 44100.0), invalid);
            assert_eq!(pcm_kernel_normalize(ptr::null_mut(), 0, 0.9), invalid);
            assert_eq!(pcm_kernel_fft(samples.as_ptr(), 2, ptr::null_mut(), samples.as_mut_ptr()), invalid);
            assert_eq!(pcm_kernel_rms(ptr::null(), 2), RMS_FAILURE);
        }
        assert_eq!(samples, vec![0.1, 0.2]);
    }

    #[test]
    fn test_rms_sentinel() {
        let samples = [0.5, -0.5];
        unsafe {
            assert_eq!(pcm_kernel_rms(samples.as_ptr(), 2), 0.5);
            assert_eq!(pcm_kernel_rms(samples.as_ptr(), 0), RMS_FAILURE);
        }
    }

    #[test]
    fn test_pitch_shift_status_codes() {
        let original = vec![0.1, 0.2, 0.3, 0.4];
        let mut samples = original.clone();
        unsafe {
            let status = pcm_kernel_pitch_shift(samples.as_mut_ptr(), 4, 44100, 30.0);
            assert_eq!(status, StatusCode::OutOfRange.code());
            assert_eq!(samples, original);

            let status = pcm_kernel_pitch_shift(samples.as_mut_ptr(), 4, 0, 3.0);
            assert_eq!(status, StatusCode::InvalidInput.code());

            let status = pcm_kernel_pitch_shift(samples.as_mut_ptr(), 4, 44100, 24.0);
            assert_eq!(status, OK);
        }
    }

    #[test]
    fn test_tempo_change() {
        let input: Vec<f64> = (0..10).map(|i| f64::from(i) * 0.05).collect();
        assert_eq!(pcm_kernel_tempo_length(10, 2.5), 4);
        assert_eq!(pcm_kernel_tempo_length(10, 0.0), StatusCode::InvalidInput.code());
        assert_eq!(pcm_kernel_tempo_length(-3, 1.0), StatusCode::InvalidInput.code());

        let mut output = vec![0.0; 8];
        let mut written: c_int = -1;
        let status = unsafe {
            pcm_kernel_tempo_change(input.as_ptr(), 10, 2.5, output.as_mut_ptr(), 8, &mut written)
        };
        assert_eq!(status, OK);
        assert_eq!(written, 4);
        assert_eq!(output[..4], tempo_change(&input, 2.5).unwrap()[..]);
    }

    #[test]
    fn test_tempo_change_capacity_checked() {
        let input = vec![0.1; 10];
        let mut output = vec![9.0; 3];
        let mut written: c_int = -1;
        unsafe {
            let status = pcm_kernel_tempo_change(input.as_ptr(), 10, 2.0, output.as_mut_ptr(), 3, &mut written);
            assert_eq!(status, StatusCode::InvalidInput.code());

            let status =
                pcm_kernel_tempo_change(input.as_ptr(), 10, 2.0, output.as_mut_ptr(), 3, ptr::null_mut());
            assert_eq!(status, StatusCode::InvalidInput.code());
        }
        assert_eq!(written, -1);
        assert_eq!(output, vec![9.0; 3]);
    }

    #[test]
    fn test_panic_is_unclassified() {
        let result: Result<(), StatusCode> = guarded("test", || panic!("boom"));
        assert_eq!(result, Err(StatusCode::Unclassified));
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(pcm_kernel_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}
