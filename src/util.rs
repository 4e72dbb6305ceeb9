//! Internal casting helpers.

// This module uses `as` casts which have been reviewed for correctness.
#![allow(clippy::as_conversions)]

/// Numeric casts that are lossless on every platform we support.
pub(crate) trait CastFrom<T> {
    fn cast_from(value: T) -> Self;
}

impl CastFrom<usize> for u64 {
    #[inline(always)]
    fn cast_from(value: usize) -> u64 {
        value as u64
    }
}
