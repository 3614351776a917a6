//! NumPy input conversion and error mapping for the Python bindings.

use crate::{KernelError, ParameterError};
use numpy::PyReadonlyArray1;
use pyo3::exceptions::{PyMemoryError, PyTypeError, PyValueError};
use pyo3::prelude::*;

/// Copy a 1-D NumPy array into an owned `f64` buffer.
///
/// `float64` arrays are copied directly and `float32` arrays are widened.
/// Anything else, including multi-dimensional arrays, is a `TypeError`.
pub fn extract_samples(audio: &Bound<'_, PyAny>, name: &str) -> PyResult<Vec<f64>> {
    if let Ok(array_f64) = audio.extract::<PyReadonlyArray1<f64>>() {
        return Ok(array_f64.as_array().to_vec());
    }
    if let Ok(array_f32) = audio.extract::<PyReadonlyArray1<f32>>() {
        return Ok(array_f32.as_array().iter().map(|&x| f64::from(x)).collect());
    }
    Err(PyTypeError::new_err(format!(
        "`{name}` must be a 1-D float32 or float64 numpy array"
    )))
}

/// Map a [`KernelError`] to the matching Python exception.
///
/// Parameter problems raise `ValueError`; scratch allocation failures raise
/// `MemoryError`.
pub fn map_error(error: KernelError) -> PyErr {
    match error {
        KernelError::Parameter(ParameterError::OutOfRange {
            parameter,
            value,
            min,
            max,
        }) => PyValueError::new_err(format!(
            "{parameter} {value} is outside the supported range [{min}, {max}]"
        )),
        KernelError::Parameter(inner) => PyValueError::new_err(inner.to_string()),
        KernelError::Allocation(inner) => PyMemoryError::new_err(inner.to_string()),
    }
}
