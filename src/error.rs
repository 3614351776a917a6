//! Error types, status codes and result utilities for kernel operations.

use std::collections::TryReserveError;
use std::fmt;

use thiserror::Error;

/// Convenience type alias for results that may contain a [`KernelError`].
pub type KernelResult<T> = Result<T, KernelError>;

/// Error types that can occur during kernel operations.
///
/// The hierarchy mirrors the failure taxonomy the host boundaries report:
/// parameter problems are split into plain invalid input and values outside a
/// supported range, and scratch allocation failures are kept apart so a host
/// can tell "bad call" from "out of memory".
#[derive(Error, Debug)]
pub enum KernelError {
    /// A parameter or buffer handed to an operation was rejected.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Internal scratch memory could not be reserved.
    #[error("Allocation error: {0}")]
    Allocation(#[from] AllocationError),
}

impl KernelError {
    /// Status code reported for this error at the C boundary.
    pub fn status(&self) -> StatusCode {
        StatusCode::from(self)
    }
}

/// Errors describing a rejected parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// The value is not acceptable for the operation at all.
    #[error("invalid value for `{parameter}`: {reason}")]
    InvalidValue {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Human readable explanation
        reason: String,
    },

    /// The value is well formed but lies outside the supported window.
    #[error("`{parameter}` = {value} is outside the supported range [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending parameter
        parameter: &'static str,
        /// The computed value that was rejected
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
}

impl ParameterError {
    /// Create an invalid value error
    pub fn invalid_value(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter,
            reason: reason.into(),
        }
    }

    /// Create an out of range error
    pub const fn out_of_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            parameter,
            value,
            min,
            max,
        }
    }
}

/// Failure to reserve scratch memory for an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not reserve {requested} elements for {purpose}: {source}")]
pub struct AllocationError {
    /// What the scratch buffer was for
    pub purpose: &'static str,
    /// Number of elements requested
    pub requested: usize,
    /// Underlying reservation failure
    #[source]
    pub source: TryReserveError,
}

impl AllocationError {
    /// Create an allocation error
    pub const fn new(purpose: &'static str, requested: usize, source: TryReserveError) -> Self {
        Self {
            purpose,
            requested,
            source,
        }
    }
}

/// Integer status codes returned across the C boundary.
///
/// `0` is success; every failure kind has its own negative value.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// The operation completed.
    Success = 0,
    /// Null or malformed buffer, non-positive rate, bad length, and similar.
    InvalidInput = -1,
    /// A parameter was outside the supported window (extreme pitch shift).
    OutOfRange = -2,
    /// Scratch memory could not be reserved.
    AllocationFailed = -3,
    /// Any other failure, e.g. a panic caught at the boundary.
    Unclassified = -4,
}

impl StatusCode {
    /// Raw integer value of the code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Returns true for [`StatusCode::Success`].
    pub const fn is_success(self) -> bool {
        matches!(self, StatusCode::Success)
    }

    /// Decodes a raw integer, returning `None` for unknown values.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            -1 => Some(Self::InvalidInput),
            -2 => Some(Self::OutOfRange),
            -3 => Some(Self::AllocationFailed),
            -4 => Some(Self::Unclassified),
            _ => None,
        }
    }
}

impl From<&KernelError> for StatusCode {
    fn from(error: &KernelError) -> Self {
        match error {
            KernelError::Parameter(ParameterError::InvalidValue { .. }) => Self::InvalidInput,
            KernelError::Parameter(ParameterError::OutOfRange { .. }) => Self::OutOfRange,
            KernelError::Allocation(_) => Self::AllocationFailed,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::InvalidInput => "invalid input",
            Self::OutOfRange => "parameter out of range",
            Self::AllocationFailed => "allocation failed",
            Self::Unclassified => "unclassified failure",
        };
        write!(f, "{label} ({})", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct() {
        let codes = [
            StatusCode::Success,
            StatusCode::InvalidInput,
            StatusCode::OutOfRange,
            StatusCode::AllocationFailed,
            StatusCode::Unclassified,
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_eq!(StatusCode::from_code(a.code()), Some(*a));
            for b in &codes[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
        assert_eq!(StatusCode::from_code(-99), None);
    }

    #[test]
    fn test_error_to_status() {
        let invalid = KernelError::from(ParameterError::invalid_value("sample_rate", "must be > 0"));
        assert_eq!(invalid.status(), StatusCode::InvalidInput);

        let range = KernelError::from(ParameterError::out_of_range("pitch_ratio", 8.0, 0.25, 4.0));
        assert_eq!(range.status(), StatusCode::OutOfRange);

        let mut scratch: Vec<f64> = Vec::new();
        let source = scratch
            .try_reserve_exact(usize::MAX)
            .expect_err("reserving usize::MAX must fail");
        let alloc = KernelError::from(AllocationError::new("snapshot", usize::MAX, source));
        assert_eq!(alloc.status(), StatusCode::AllocationFailed);
    }

    #[test]
    fn test_error_messages() {
        let err = ParameterError::invalid_value("tempo_factor", "must be finite and > 0");
        assert_eq!(
            err.to_string(),
            "invalid value for `tempo_factor`: must be finite and > 0"
        );
        assert!(StatusCode::OutOfRange.to_string().contains("-2"));
    }
}
