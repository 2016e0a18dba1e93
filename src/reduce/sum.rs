//! `group_sum`: Kahan-compensated per-group sum, `spec.md` §4.3.

use crate::accum::KahanSum;
use crate::element::Na;
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};
use crate::mincount::{as_given, finalize_cell};
use std::ops::{Add, Sub};

/// Sum each column within each group, Kahan-compensated, skipping NA
/// cells. `counts[g]` tallies every row with `labels[i] == g`
/// (including all-NA rows), independent of `N_obs`.
#[allow(clippy::too_many_arguments)]
pub fn group_sum<T>(
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
    T: Na + Copy + Default + Add<Output = T> + Sub<Output = T>,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_sum", n_rows, k_cols, ngroups, is_datetimelike, min_count);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, ngroups, k_cols);

    let mut sums = vec![KahanSum::<T>::new(); ngroups * k_cols];
    let mut n_obs = vec![0u64; ngroups * k_cols];

    // accumulate: row-major over i, column-inner, per spec.md §4.2/§9.
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

    // finalize
    let min_count = as_given(min_count);
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            let rm_cell = result_mask.as_deref_mut().map(|rm| &mut rm[idx]);
            let value = finalize_cell(
                g,
                j,
                n_obs[idx],
                min_count,
                sums[idx].sum,
                is_datetimelike,
                rm_cell,
            )?;
            out_view.set(g, j, value);
        }
    }
    Ok(())
}

/// Object-element `group_sum`: accumulation is plain (no Kahan
/// compensation, since `T` need not be numeric) and the first
/// contribution in a group is *assigned*, not combined, to avoid
/// forcing an implicit identity element on non-numeric objects
/// (`spec.md` §4.3).
#[allow(clippy::too_many_arguments)]
pub fn group_sum_obj<V, IsNull, Combine>(
    values: &[Option<V>],
    labels: &[isize],
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    min_count: i64,
    is_null: IsNull,
    combine: Combine,
    out: &mut [Option<V>],
    counts: &mut [i64],
) -> KernelResult<()>
where
    V: Clone,
    IsNull: Fn(&V) -> bool,
    Combine: Fn(&V, &V) -> V,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_sum_obj", n_rows, k_cols, ngroups, min_count);
    let mut n_obs = vec![0u64; ngroups * k_cols];
    let mut acc: Vec<Option<V>> = vec![None; ngroups * k_cols];

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
            let v = cell.as_ref().unwrap();
            let idx = g * k_cols + j;
            acc[idx] = Some(match &acc[idx] {
                None => v.clone(),
                Some(prev) => combine(prev, v),
            });
            n_obs[idx] += 1;
        }
    }

    let min_count = as_given(min_count);
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            out[idx] = if n_obs[idx] >= min_count { acc[idx].clone() } else { None };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_with_na_and_min_count() {
        // spec.md §8 scenario 1
        let values: [f64; 6] = [1.0, 2.0, f64::NAN, 3.0, 4.0, f64::NAN];
        let labels = [0isize, 0, 1];
        let mut out = [0.0f64; 4];
        let mut counts = [0i64; 2];
        group_sum(
            &values, &labels, None, 3, 2, 2, false, 2, &mut out, &mut counts, None,
        )
        .unwrap();
        assert!(out[0].is_nan());
        assert_eq!(out[1], 5.0);
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert_eq!(counts, [2, 1]);
    }

    #[test]
    fn label_minus_one_excluded_from_sum_and_counts() {
        let values = [1.0f64, 2.0, 3.0];
        let labels = [0isize, -1, 0];
        let mut out = [0.0f64; 1];
        let mut counts = [0i64; 1];
        group_sum(
            &values, &labels, None, 3, 1, 1, false, 0, &mut out, &mut counts, None,
        )
        .unwrap();
        assert_eq!(out[0], 4.0);
        assert_eq!(counts[0], 2);
    }

    #[test]
    fn kahan_bound_holds_on_a_long_group() {
        let n = 100_000;
        let values: Vec<f64> = (0..n).map(|_| 0.1).collect();
        let labels = vec![0isize; n];
        let mut out = [0.0f64];
        let mut counts = [0i64];
        group_sum(&values, &labels, None, n, 1, 1, false, 0, &mut out, &mut counts, None).unwrap();
        let exact = 0.1 * n as f64;
        assert!((out[0] - exact).abs() <= 2.0 * f64::EPSILON * exact);
    }
}
