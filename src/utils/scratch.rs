//! Fallible allocation of internal scratch buffers.
//!
//! Operations that need a working copy reserve it with
//! [`Vec::try_reserve_exact`] so that running out of memory surfaces as an
//! [`AllocationError`](crate::AllocationError) instead of aborting the host.
//! Every buffer returned here is owned by the calling operation and dropped
//! before that operation returns.

use crate::{AllocationError, KernelResult};

/// Allocates a vector of `len` copies of `value`.
pub fn try_filled<T: Clone>(len: usize, value: T, purpose: &'static str) -> KernelResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| AllocationError::new(purpose, len, source))?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Allocates an owned copy of `samples`.
pub fn try_snapshot<T: Copy>(samples: &[T], purpose: &'static str) -> KernelResult<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(samples.len())
        .map_err(|source| AllocationError::new(purpose, samples.len(), source))?;
    buffer.extend_from_slice(samples);
    Ok(buffer)
}
