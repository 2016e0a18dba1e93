//! `group_mean`: Kahan-compensated per-group mean, `spec.md` §4.5.
//! Fixed at `min_count = 1` (the spec's "-1 sentinel meaning >= 1
//! required"); empty groups produce the element type's NA
//! representation (NaN, or NaT when `is_datetimelike`).

use crate::accum::KahanSum;
use crate::element::{DivByCount, Na};
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};
use crate::mincount::finalize_cell;
use std::ops::{Add, Sub};

#[allow(clippy::too_many_arguments)]
pub fn group_mean<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    out: &mut [T],
    counts: &mut [i64],
    mut result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + Copy + Default + Add<Output = T> + Sub<Output = T> + DivByCount,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_mean", n_rows, k_cols, ngroups, is_datetimelike);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, ngroups, k_cols);

    let mut sums = vec![KahanSum::<T>::new(); ngroups * k_cols];
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
            sums[idx].add(v);
            n_obs[idx] += 1;
        }
    }

    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            let n = n_obs[idx];
            // guard against dividing by zero; the result is discarded
            // by finalize_cell whenever n < 1 anyway.
            let mean = sums[idx].sum.div_by_count(n.max(1));
            let rm_cell = result_mask.as_deref_mut().map(|rm| &mut rm[idx]);
            let value = finalize_cell(g, j, n, 1, mean, is_datetimelike, rm_cell)?;
            out_view.set(g, j, value);
        }
    }
    Ok(())
}
