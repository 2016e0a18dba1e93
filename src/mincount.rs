//! The min-count / empty-group policy shared by every reducer
//! (`spec.md` §3's "min-count threshold" and §4.2's finalize step).
//!
//! Each reducer family coerces its caller-supplied `min_count` (`mu`)
//! differently before calling `finalize_cell`:
//!
//! - `sum`/`prod`: used as given (negative/unsupplied treated as 0).
//! - `first`/`last`/`nth`/`min`/`max`: coerced to `max(mu, 1)`.
//! - `mean`/`ohlc`: fixed at 1 (at least one non-NA contributor).
//! - `var`: fixed at `ddof + 1` (`n_obs > ddof` to produce a finite value).
//! - `median`/`quantile`: fixed at 1.

use crate::element::Na;
use crate::error::{KernelError, KernelResult};

/// `sum`/`prod`: the threshold is exactly `mu`, clamped to nonnegative.
#[inline]
pub fn as_given(min_count: i64) -> u64 {
    min_count.max(0) as u64
}

/// `first`/`last`/`nth`/`min`/`max`: coerced to `max(mu, 1)`.
#[inline]
pub fn at_least_one(min_count: i64) -> u64 {
    min_count.max(1) as u64
}

/// `var`: require strictly more observations than `ddof`.
#[inline]
pub fn at_least_ddof_plus_one(ddof: u64) -> u64 {
    ddof + 1
}

/// Decide whether a single output cell `(group, col)` holds its
/// accumulated `value` or the NA representation, honoring an optional
/// `result_mask`. Mirrors `spec.md` §3 invariant 3 exactly: either
/// `n_obs >= min_count` and the cell holds the reduction, or it holds
/// the type's NA representation (or `result_mask[g,j] = true`).
///
/// When the element type has no in-band NA representation (`U64`, or
/// `I64` without `is_datetimelike`) and no `result_mask` was supplied,
/// this returns `KernelError::EmptyGroupUnsignedError` -- raised here,
/// after the accumulation loop has already finished, never from inside
/// the hot loop (`spec.md` §7).
#[inline]
pub fn finalize_cell<T: Na + Copy>(
    group: usize,
    col: usize,
    n_obs: u64,
    min_count: u64,
    value: T,
    is_datetimelike: bool,
    mut result_mask: Option<&mut bool>,
) -> KernelResult<T> {
    if n_obs >= min_count {
        if let Some(rm) = result_mask.as_deref_mut() {
            *rm = false;
        }
        return Ok(value);
    }
    match T::na_repr(is_datetimelike) {
        Some(na) => {
            if let Some(rm) = result_mask.as_deref_mut() {
                *rm = true;
            }
            Ok(na)
        }
        None => match result_mask {
            Some(rm) => {
                *rm = true;
                Ok(value)
            }
            None => Err(KernelError::EmptyGroupUnsignedError { group, col }),
        },
    }
}
