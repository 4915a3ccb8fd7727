//! Limits and checked arithmetic for untrusted offsets
//!
//! Offsets and sizes read from container headers are attacker-controlled.
//! These helpers turn overflow and oversized requests into errors instead of
//! panics or runaway allocations.

use crate::Error;

/// Maximum size an in-memory store may grow to (1 GB)
pub const MAX_ALLOCATION_SIZE: usize = 1024 * 1024 * 1024;

/// Maximum file size for memory mapping (16 GB)
pub const MAX_MMAP_SIZE: u64 = 16 * 1024 * 1024 * 1024;

/// Validate that a size is within allocation limits
///
/// # Security
/// Prevents memory exhaustion from a single far-away write
pub fn validate_allocation_size(size: u64, limit: usize, context: &str) -> crate::Result<usize> {
    if size > limit as u64 {
        return Err(Error::out_of_range(format!(
            "{} size {} exceeds limit {}",
            context, size, limit
        )));
    }

    size.try_into()
        .map_err(|_| Error::out_of_range(format!("{} size exceeds platform limits", context)))
}

/// Add an offset and a length, failing on overflow
pub fn checked_end(offset: u64, length: u64, context: &str) -> crate::Result<u64> {
    offset.checked_add(length).ok_or_else(|| {
        Error::out_of_range(format!(
            "{}: offset {} + length {} overflows",
            context, offset, length
        ))
    })
}

/// Safely convert u64 to usize with platform checking
///
/// # Security
/// Prevents truncation on 32-bit platforms
pub fn u64_to_usize(value: u64, context: &str) -> crate::Result<usize> {
    value.try_into().map_err(|_| {
        Error::out_of_range(format!(
            "{}: value {} exceeds platform usize limit",
            context, value
        ))
    })
}

/// Convert an absolute offset to the signed form taken by `Source::pull`
pub fn u64_to_i64(value: u64, context: &str) -> crate::Result<i64> {
    i64::try_from(value).map_err(|_| {
        Error::out_of_range(format!("{}: offset {} exceeds i64 range", context, value))
    })
}
