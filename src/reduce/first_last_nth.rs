//! `group_nth` / `group_first` / `group_last`, `spec.md` §4.8.
//!
//! `group_nth` freezes the value on the row where the running non-NA
//! count first reaches the caller-specified `rank` (1-based) and never
//! overwrites it afterward (`SPEC_FULL.md` Open Question 3 resolves
//! this as intentional "freeze", not "allow later overwrite").
//! `group_first` is `group_nth` with `rank = 1`. `group_last` instead
//! overwrites on every non-NA observation, so it ends up holding the
//! most recent one.

use crate::element::Na;
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};
use crate::mincount::{at_least_one, finalize_cell};

#[allow(clippy::too_many_arguments)]
pub fn group_nth<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    min_count: i64,
    rank: u64,
    out: &mut [T],
    counts: &mut [i64],
    mut result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + Copy + Default,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_nth", n_rows, k_cols, ngroups, min_count, rank);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, ngroups, k_cols);

    let mut seen = vec![T::default(); ngroups * k_cols];
    let mut n_obs = vec![0u64; ngroups * k_cols];

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            continue;
        }
        let g = lab as usize;
        counts[g] += 1;
        for j in 0..k_cols {
            let v = values.get(i, j);
            if crate::element::is_na_masked(v, is_datetimelike, mask_bit(mask.as_ref(), i, j)) {
                continue;
            }
            let idx = g * k_cols + j;
            n_obs[idx] += 1;
            if n_obs[idx] == rank {
                seen[idx] = v; // frozen: never written again
            }
        }
    }

    // reaching the nth rank requires at least `rank` observations,
    // regardless of how the caller's min_count coerces.
    let required = at_least_one(min_count).max(rank.max(1));
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            let rm_cell = result_mask.as_deref_mut().map(|rm| &mut rm[idx]);
            let value =
                finalize_cell(g, j, n_obs[idx], required, seen[idx], is_datetimelike, rm_cell)?;
            out_view.set(g, j, value);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn group_first<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    min_count: i64,
    out: &mut [T],
    counts: &mut [i64],
    result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + Copy + Default,
{
    group_nth(
        values,
        labels,
        mask,
        n_rows,
        k_cols,
        ngroups,
        is_datetimelike,
        min_count,
        1,
        out,
        counts,
        result_mask,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn group_last<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    min_count: i64,
    out: &mut [T],
    counts: &mut [i64],
    mut result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + Copy + Default,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_last", n_rows, k_cols, ngroups, min_count);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, ngroups, k_cols);

    let mut last = vec![T::default(); ngroups * k_cols];
    let mut n_obs = vec![0u64; ngroups * k_cols];

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            continue;
        }
        let g = lab as usize;
        counts[g] += 1;
        for j in 0..k_cols {
            let v = values.get(i, j);
            if crate::element::is_na_masked(v, is_datetimelike, mask_bit(mask.as_ref(), i, j)) {
                continue;
            }
            let idx = g * k_cols + j;
            last[idx] = v; // overwrite on every non-NA observation
            n_obs[idx] += 1;
        }
    }

    let min_count = at_least_one(min_count);
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            let rm_cell = result_mask.as_deref_mut().map(|rm| &mut rm[idx]);
            let value =
                finalize_cell(g, j, n_obs[idx], min_count, last[idx], is_datetimelike, rm_cell)?;
            out_view.set(g, j, value);
        }
    }
    Ok(())
}

/// Object-element `group_first`/`group_nth`/`group_last`: the NA
/// output is the language's `None`, per `spec.md` §4.8.
#[allow(clippy::too_many_arguments)]
pub fn group_nth_obj<V, IsNull>(
    values: &[Option<V>],
    labels: &[isize],
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    min_count: i64,
    rank: u64,
    is_null: IsNull,
    out: &mut [Option<V>],
    counts: &mut [i64],
) -> KernelResult<()>
where
    V: Clone,
    IsNull: Fn(&V) -> bool,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_nth_obj", n_rows, k_cols, ngroups, min_count, rank);
    let mut seen: Vec<Option<V>> = vec![None; ngroups * k_cols];
    let mut n_obs = vec![0u64; ngroups * k_cols];

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            continue;
        }
        let g = lab as usize;
        counts[g] += 1;
        for j in 0..k_cols {
            let cell = &values[i * k_cols + j];
            let is_na = match cell {
                None => true,
                Some(v) => is_null(v),
            };
            if is_na {
                continue;
            }
            let idx = g * k_cols + j;
            n_obs[idx] += 1;
            if n_obs[idx] == rank {
                seen[idx] = cell.clone();
            }
        }
    }

    let required = at_least_one(min_count).max(rank.max(1));
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            out[idx] = if n_obs[idx] >= required { seen[idx].clone() } else { None };
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn group_last_obj<V, IsNull>(
    values: &[Option<V>],
    labels: &[isize],
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    min_count: i64,
    is_null: IsNull,
    out: &mut [Option<V>],
    counts: &mut [i64],
) -> KernelResult<()>
where
    V: Clone,
    IsNull: Fn(&V) -> bool,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_last_obj", n_rows, k_cols, ngroups, min_count);
    let mut last: Vec<Option<V>> = vec![None; ngroups * k_cols];
    let mut n_obs = vec![0u64; ngroups * k_cols];

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            continue;
        }
        let g = lab as usize;
        counts[g] += 1;
        for j in 0..k_cols {
            let cell = &values[i * k_cols + j];
            let is_na = match cell {
                None => true,
                Some(v) => is_null(v),
            };
            if is_na {
                continue;
            }
            let idx = g * k_cols + j;
            last[idx] = cell.clone();
            n_obs[idx] += 1;
        }
    }

    let min_count = at_least_one(min_count);
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            out[idx] = if n_obs[idx] >= min_count { last[idx].clone() } else { None };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nth_freezes_on_first_reach_and_is_never_overwritten() {
        let values = [1.0f64, 2.0, 3.0, 4.0];
        let labels = [0isize; 4];
        let mut out = [0.0f64; 1];
        let mut counts = [0i64; 1];
        group_nth(&values, &labels, None, 4, 1, 1, false, 0, 2, &mut out, &mut counts, None)
            .unwrap();
        assert_eq!(out[0], 2.0); // the 2nd non-NA value, frozen
    }

    #[test]
    fn first_and_last_over_a_group_with_leading_trailing_na() {
        let values = [f64::NAN, 1.0, 2.0, f64::NAN];
        let labels = [0isize; 4];
        let mut first_out = [0.0f64; 1];
        let mut last_out = [0.0f64; 1];
        let mut counts = [0i64; 1];
        group_first(&values, &labels, None, 4, 1, 1, false, 0, &mut first_out, &mut counts, None)
            .unwrap();
        counts = [0i64; 1];
        group_last(&values, &labels, None, 4, 1, 1, false, 0, &mut last_out, &mut counts, None)
            .unwrap();
        assert_eq!(first_out[0], 1.0);
        assert_eq!(last_out[0], 2.0);
    }
}
