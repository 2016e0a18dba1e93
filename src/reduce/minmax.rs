//! `group_min` / `group_max`, `spec.md` §4.7. `min_count` is coerced to
//! `max(mu, 1)`.

use crate::element::{Na, OrdExtreme};
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};
use crate::mincount::{at_least_one, finalize_cell};

#[allow(clippy::too_many_arguments)]
fn group_extreme<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    min_count: i64,
    compute_max: bool,
    out: &mut [T],
    counts: &mut [i64],
    mut result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + OrdExtreme,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = if compute_max { "group_max" } else { "group_min" }, n_rows, k_cols, ngroups, min_count);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, ngroups, k_cols);

    let seed = if compute_max { T::FLOOR } else { T::CEILING };
    let mut extrema = vec![seed; ngroups * k_cols];
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
            let cur = extrema[idx];
            let better = if compute_max { v > cur } else { v < cur };
            if better {
                extrema[idx] = v;
            }
            n_obs[idx] += 1;
        }
    }

    let min_count = at_least_one(min_count);
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            let rm_cell = result_mask.as_deref_mut().map(|rm| &mut rm[idx]);
            let value =
                finalize_cell(g, j, n_obs[idx], min_count, extrema[idx], is_datetimelike, rm_cell)?;
            out_view.set(g, j, value);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn group_min<T: Na + OrdExtreme>(
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
) -> KernelResult<()> {
    group_extreme(
        values,
        labels,
        mask,
        n_rows,
        k_cols,
        ngroups,
        is_datetimelike,
        min_count,
        false,
        out,
        counts,
        result_mask,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn group_max<T: Na + OrdExtreme>(
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
) -> KernelResult<()> {
    group_extreme(
        values,
        labels,
        mask,
        n_rows,
        k_cols,
        ngroups,
        is_datetimelike,
        min_count,
        true,
        out,
        counts,
        result_mask,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;

    #[test]
    fn min_and_max_skip_na() {
        let values = [3.0f64, f64::NAN, 1.0, 5.0];
        let labels = [0isize, 0, 0, 1];
        let mut min_out = [0.0f64; 2];
        let mut max_out = [0.0f64; 2];
        let mut counts = [0i64; 2];
        group_min(&values, &labels, None, 4, 1, 2, false, 0, &mut min_out, &mut counts, None)
            .unwrap();
        counts = [0i64; 2];
        group_max(&values, &labels, None, 4, 1, 2, false, 0, &mut max_out, &mut counts, None)
            .unwrap();
        assert_eq!(min_out, [1.0, 5.0]);
        assert_eq!(max_out, [3.0, 5.0]);
    }

    #[test]
    fn unsigned_empty_group_without_result_mask_errors() {
        let values: [u64; 1] = [7];
        let labels = [0isize];
        let mut out = [0u64; 2]; // group 1 has no rows at all
        let mut counts = [0i64; 2];
        let err =
            group_max(&values, &labels, None, 1, 1, 2, false, 0, &mut out, &mut counts, None)
                .unwrap_err();
        assert_eq!(err, KernelError::EmptyGroupUnsignedError { group: 1, col: 0 });
    }

    #[test]
    fn unsigned_empty_group_with_result_mask_succeeds() {
        let values: [u64; 1] = [7];
        let labels = [0isize];
        let mut out = [0u64; 2];
        let mut counts = [0i64; 2];
        let mut result_mask = [false; 2];
        group_max(
            &values,
            &labels,
            None,
            1,
            1,
            2,
            false,
            0,
            &mut out,
            &mut counts,
            Some(&mut result_mask),
        )
        .unwrap();
        assert_eq!(result_mask, [false, true]);
    }
}
