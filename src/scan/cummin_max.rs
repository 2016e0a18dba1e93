//! `group_cummin` / `group_cummax`, `spec.md` §4.14. Each `(group,
//! column)` pair carries a running extremum plus a `seen_na` latch
//! implementing the two-state machine named in the spec: `CLEAN`
//! transitions to `SEEN_NA` the first time a non-skipna NA is observed,
//! and `SEEN_NA` is absorbing for the remainder of that group+column.
//!
//! `SPEC_FULL.md` Open Question 1 resolves the donor-adjacent "mutable
//! input mask" wart as a bug, not a contract worth preserving: NA
//! propagation here writes only to the optional `result_mask` output
//! parameter (same shape as `out`). The input `mask` stays read-only.

use crate::element::{Na, OrdExtreme};
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};

#[allow(clippy::too_many_arguments)]
fn group_cum_extreme<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    skipna: bool,
    compute_max: bool,
    out: &mut [T],
    mut result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + OrdExtreme,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(
        kernel = if compute_max { "group_cummax" } else { "group_cummin" },
        n_rows, k_cols, ngroups, is_datetimelike, skipna
    );
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, n_rows, k_cols);

    let na_fill = T::na_repr(is_datetimelike).unwrap_or(if compute_max { T::FLOOR } else { T::CEILING });
    let seed = if compute_max { T::FLOOR } else { T::CEILING };
    let mut running = vec![seed; ngroups * k_cols];
    // SEEN_NA latch: once set for a (group, column), every later row in
    // that group+column reads back NA regardless of further updates.
    let mut seen_na = vec![false; ngroups * k_cols];

    let mut mark_na = |rm: &mut Option<&mut [bool]>, i: usize, j: usize| {
        if let Some(rm) = rm.as_deref_mut() {
            rm[i * k_cols + j] = true;
        }
    };

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            for j in 0..k_cols {
                out_view.set(i, j, na_fill);
                mark_na(&mut result_mask, i, j);
            }
            continue;
        }
        let g = lab as usize;
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            if seen_na[idx] {
                out_view.set(i, j, na_fill);
                mark_na(&mut result_mask, i, j);
                continue;
            }
            let v = values.get(i, j);
            if crate::element::is_na_masked(v, is_datetimelike, mask_bit(mask.as_ref(), i, j)) {
                if skipna {
                    // skip: running extremum untouched, cell reads NA
                    // but the latch does not engage.
                    out_view.set(i, j, na_fill);
                } else {
                    seen_na[idx] = true;
                    out_view.set(i, j, na_fill);
                }
                mark_na(&mut result_mask, i, j);
                continue;
            }
            let better = if compute_max { v > running[idx] } else { v < running[idx] };
            if better {
                running[idx] = v;
            }
            out_view.set(i, j, running[idx]);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn group_cummin<T: Na + OrdExtreme>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    skipna: bool,
    out: &mut [T],
    result_mask: Option<&mut [bool]>,
) -> KernelResult<()> {
    group_cum_extreme(
        values, labels, mask, n_rows, k_cols, ngroups, is_datetimelike, skipna, false, out,
        result_mask,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn group_cummax<T: Na + OrdExtreme>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    skipna: bool,
    out: &mut [T],
    result_mask: Option<&mut [bool]>,
) -> KernelResult<()> {
    group_cum_extreme(
        values, labels, mask, n_rows, k_cols, ngroups, is_datetimelike, skipna, true, out,
        result_mask,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cummax_tracks_running_maximum_per_group() {
        let values = [1.0f64, 3.0, 2.0, 5.0, 4.0];
        let labels = [0isize; 5];
        let mut out = [0.0f64; 5];
        group_cummax(&values, &labels, None, 5, 1, 1, false, true, &mut out, None).unwrap();
        assert_eq!(out, [1.0, 3.0, 3.0, 5.0, 5.0]);
    }

    #[test]
    fn cummin_skipna_leaves_running_extremum_untouched() {
        let values = [5.0f64, f64::NAN, 2.0];
        let labels = [0isize; 3];
        let mut out = [0.0f64; 3];
        group_cummin(&values, &labels, None, 3, 1, 1, false, true, &mut out, None).unwrap();
        assert_eq!(out[0], 5.0);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 2.0);
    }

    #[test]
    fn non_skipna_na_latches_for_the_rest_of_the_group() {
        let values = [5.0f64, f64::NAN, 2.0, 1.0];
        let labels = [0isize; 4];
        let mut out = [0.0f64; 4];
        group_cummin(&values, &labels, None, 4, 1, 1, false, false, &mut out, None).unwrap();
        assert_eq!(out[0], 5.0);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
    }

    #[test]
    fn result_mask_mirrors_na_cells_without_touching_the_input_mask() {
        let values: [u64; 4] = [5, 0, 2, 1];
        let labels = [0isize; 4];
        let mut out = [0u64; 4];
        let mut result_mask = [false; 4];
        group_cummax(&values, &labels, None, 4, 1, 1, false, true, &mut out, Some(&mut result_mask))
            .unwrap();
        assert_eq!(result_mask, [false, false, false, false]);
    }
}
