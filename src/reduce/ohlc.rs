//! `group_ohlc`, `spec.md` §4.9. Single input column, four output
//! columns (open, high, low, close) per group. `counts[g]` tallies
//! every row in the group, including all-NaN rows.

use crate::element::{Na, OrdExtreme};
use crate::error::{validate_lengths, validate_ohlc_shape, KernelError, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixViewMut};

const OPEN: usize = 0;
const HIGH: usize = 1;
const LOW: usize = 2;
const CLOSE: usize = 3;

/// Seed value for an output cell that has not yet seen a non-NA row in
/// its group. `na_repr` answers this when one exists (NaN / NaT); when
/// it doesn't (`U64`, or `I64` without `is_datetimelike`) the seed
/// falls back to `FLOOR`, but that fallback must never be allowed to
/// reach the caller undetected -- `finalize_empty_cell` below is what
/// turns an unseen cell into either a `result_mask` bit or an
/// `EmptyGroupUnsignedError`, exactly like every other reducer's
/// `mincount::finalize_cell`.
#[inline]
fn unseen_seed<T: Na + OrdExtreme>(is_datetimelike: bool) -> T {
    T::na_repr(is_datetimelike).unwrap_or(T::FLOOR)
}

/// Finalize a single OHLC output cell for a group that never saw a
/// non-NA row. Mirrors `mincount::finalize_cell`'s contract: if `T`
/// has an in-band NA representation, write it; else require a
/// `result_mask` bit, or fail with `EmptyGroupUnsignedError`.
#[inline]
fn finalize_empty_cell<T: Na + OrdExtreme>(
    group: usize,
    col: usize,
    is_datetimelike: bool,
    result_mask: Option<&mut bool>,
) -> KernelResult<T> {
    match T::na_repr(is_datetimelike) {
        Some(na) => {
            if let Some(rm) = result_mask {
                *rm = true;
            }
            Ok(na)
        }
        None => match result_mask {
            Some(rm) => {
                *rm = true;
                Ok(T::FLOOR)
            }
            None => Err(KernelError::EmptyGroupUnsignedError { group, col }),
        },
    }
}

#[allow(clippy::too_many_arguments)]
pub fn group_ohlc<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    ngroups: usize,
    is_datetimelike: bool,
    out: &mut [T],
    counts: &mut [i64],
    mut result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + OrdExtreme,
{
    validate_lengths(n_rows, labels.len())?;
    validate_ohlc_shape(1, 4)?;
    tracing::trace!(kernel = "group_ohlc", n_rows, ngroups, is_datetimelike);
    let mut out_view = MatrixViewMut::new(out, ngroups, 4);

    let seed = unseen_seed::<T>(is_datetimelike);
    for g in 0..ngroups {
        out_view.set(g, OPEN, seed);
        out_view.set(g, HIGH, seed);
        out_view.set(g, LOW, seed);
        out_view.set(g, CLOSE, seed);
    }
    let mut seen = vec![false; ngroups];

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            continue;
        }
        let g = lab as usize;
        counts[g] += 1;
        let v = values[i];
        if crate::element::is_na_masked(v, is_datetimelike, mask_bit(mask.as_ref(), i, 0)) {
            continue;
        }
        if !seen[g] {
            out_view.set(g, OPEN, v);
            out_view.set(g, HIGH, v);
            out_view.set(g, LOW, v);
            seen[g] = true;
        } else {
            if v > out_view.get(g, HIGH) {
                out_view.set(g, HIGH, v);
            }
            if v < out_view.get(g, LOW) {
                out_view.set(g, LOW, v);
            }
        }
        out_view.set(g, CLOSE, v);
    }

    // groups that never saw a non-NA row still hold `seed`; route them
    // through the same result_mask/EmptyGroupUnsignedError contract
    // every other reducer's finalize pass honors (spec.md §3 invariant
    // 3, §7).
    for g in 0..ngroups {
        if seen[g] {
            continue;
        }
        for col in [OPEN, HIGH, LOW, CLOSE] {
            let idx = g * 4 + col;
            let rm_cell = result_mask.as_deref_mut().map(|rm| &mut rm[idx]);
            let value = finalize_empty_cell::<T>(g, col, is_datetimelike, rm_cell)?;
            out_view.set(g, col, value);
        }
    }
    Ok(())
}
