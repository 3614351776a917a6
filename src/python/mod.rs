//! Python bindings for the pcm_kernel library.
//!
//! Exposes the kernel as a `pcm_kernel` extension module of plain functions.
//! Each function copies its NumPy input into an owned buffer, runs the kernel
//! operation and returns a new `float64` array, so the caller's array is never
//! modified.
//!
//! # Examples
//! ```python
//! import numpy as np
//! import pcm_kernel
//!
//! audio = np.sin(np.linspace(0, 200, 44100))
//! audio = pcm_kernel.highpass_filter(audio)
//! audio = pcm_kernel.normalize(audio, target_level=0.9)
//! real, imag = pcm_kernel.compute_fft(audio)
//! up = pcm_kernel.change_pitch(audio, semitones=7)
//! ```

mod utils;

use crate::operations::types::FftDirection;
use crate::{
    highpass, lowpass, noise_gate as gate, normalize_peak, pitch_shift, rms as rms_level,
    spectrum, tempo_change, transform_parts,
};
use numpy::{IntoPyArray, PyArray1};
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use utils::{extract_samples, map_error};

type PyArrayF64<'py> = Bound<'py, PyArray1<f64>>;

/// Apply a one-pole low-pass filter and return the filtered copy.
#[pyfunction]
#[pyo3(name = "lowpass_filter", signature = (audio, cutoff_freq = 8000.0, sample_rate = 44100.0))]
fn lowpass_filter<'py>(
    py: Python<'py>,
    audio: &Bound<'py, PyAny>,
    cutoff_freq: f64,
    sample_rate: f64,
) -> PyResult<PyArrayF64<'py>> {
    let mut samples = extract_samples(audio, "audio")?;
    lowpass(&mut samples, cutoff_freq, sample_rate).map_err(map_error)?;
    Ok(samples.into_pyarray(py))
}

/// Apply a one-pole high-pass filter and return the filtered copy.
#[pyfunction]
#[pyo3(name = "highpass_filter", signature = (audio, cutoff_freq = 80.0, sample_rate = 44100.0))]
fn highpass_filter<'py>(
    py: Python<'py>,
    audio: &Bound<'py, PyAny>,
    cutoff_freq: f64,
    sample_rate: f64,
) -> PyResult<PyArrayF64<'py>> {
    let mut samples = extract_samples(audio, "audio")?;
    highpass(&mut samples, cutoff_freq, sample_rate).map_err(map_error)?;
    Ok(samples.into_pyarray(py))
}

/// Attenuate samples quieter than `noise_floor` by `reduction_factor`.
#[pyfunction]
#[pyo3(name = "noise_gate", signature = (audio, noise_floor = 0.01, reduction_factor = 0.5))]
fn noise_gate<'py>(
    py: Python<'py>,
    audio: &Bound<'py, PyAny>,
    noise_floor: f64,
    reduction_factor: f64,
) -> PyResult<PyArrayF64<'py>> {
    let mut samples = extract_samples(audio, "audio")?;
    gate(&mut samples, noise_floor, reduction_factor);
    Ok(samples.into_pyarray(py))
}

/// Scale the signal so its peak magnitude equals `target_level`.
///
/// Silence is returned unchanged.
#[pyfunction]
#[pyo3(name = "normalize", signature = (audio, target_level = 0.95))]
fn normalize<'py>(py: Python<'py>, audio: &Bound<'py, PyAny>, target_level: f64) -> PyResult<PyArrayF64<'py>> {
    let mut samples = extract_samples(audio, "audio")?;
    normalize_peak(&mut samples, target_level);
    Ok(samples.into_pyarray(py))
}

/// Forward spectrum as `(real, imag)`, each with `len(audio)` bins.
#[pyfunction]
#[pyo3(name = "compute_fft", signature = (audio))]
fn compute_fft<'py>(py: Python<'py>, audio: &Bound<'py, PyAny>) -> PyResult<(PyArrayF64<'py>, PyArrayF64<'py>)> {
    let samples = extract_samples(audio, "audio")?;
    let (real, imag) = spectrum(&samples).map_err(map_error)?.into_parts();
    Ok((real.into_pyarray(py), imag.into_pyarray(py)))
}

/// Inverse transform of `real + i*imag`, returned as `(real, imag)`.
///
/// Both arrays must share a power-of-two length.
#[pyfunction]
#[pyo3(name = "inverse_fft", signature = (real, imag))]
fn inverse_fft<'py>(
    py: Python<'py>,
    real: &Bound<'py, PyAny>,
    imag: &Bound<'py, PyAny>,
) -> PyResult<(PyArrayF64<'py>, PyArrayF64<'py>)> {
    let mut real = extract_samples(real, "real")?;
    let mut imag = extract_samples(imag, "imag")?;
    transform_parts(&mut real, &mut imag, FftDirection::Inverse).map_err(map_error)?;
    Ok((real.into_pyarray(py), imag.into_pyarray(py)))
}

/// Root-mean-square level. Raises `ValueError` for an empty array.
#[pyfunction]
#[pyo3(name = "rms", signature = (audio))]
fn rms(audio: &Bound<'_, PyAny>) -> PyResult<f64> {
    let samples = extract_samples(audio, "audio")?;
    rms_level(&samples).map_err(map_error)
}

/// Resample to a new tempo; the result has `floor(len / tempo_factor)` samples.
#[pyfunction]
#[pyo3(name = "change_tempo", signature = (audio, tempo_factor))]
fn change_tempo<'py>(py: Python<'py>, audio: &Bound<'py, PyAny>, tempo_factor: f64) -> PyResult<PyArrayF64<'py>> {
    let samples = extract_samples(audio, "audio")?;
    let output = tempo_change(&samples, tempo_factor).map_err(map_error)?;
    Ok(output.into_pyarray(py))
}

/// Shift pitch by `semitones` at fixed length.
///
/// Raises `ValueError` when the shift exceeds two octaves either way.
#[pyfunction]
#[pyo3(name = "change_pitch", signature = (audio, semitones, sample_rate = 44100.0))]
fn change_pitch<'py>(
    py: Python<'py>,
    audio: &Bound<'py, PyAny>,
    semitones: f64,
    sample_rate: f64,
) -> PyResult<PyArrayF64<'py>> {
    let mut samples = extract_samples(audio, "audio")?;
    pitch_shift(&mut samples, sample_rate, semitones).map_err(map_error)?;
    Ok(samples.into_pyarray(py))
}

/// Register the pcm_kernel Python module.
#[pymodule]
fn pcm_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Filters and levels
    m.add_function(wrap_pyfunction!(lowpass_filter, m)?)?;
    m.add_function(wrap_pyfunction!(highpass_filter, m)?)?;
    m.add_function(wrap_pyfunction!(noise_gate, m)?)?;
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    m.add_function(wrap_pyfunction!(rms, m)?)?;

    // Spectral
    m.add_function(wrap_pyfunction!(compute_fft, m)?)?;
    m.add_function(wrap_pyfunction!(inverse_fft, m)?)?;

    // Remapping
    m.add_function(wrap_pyfunction!(change_tempo, m)?)?;
    m.add_function(wrap_pyfunction!(change_pitch, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
