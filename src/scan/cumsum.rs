//! `group_cumsum`, `spec.md` §4.13. Preserves original row order;
//! output shape matches `values` (`N x K`). The "break inner loop on
//! non-skipna NA" behavior is preserved exactly as an observable
//! effect, per the `spec.md` §9 redesign note telling us not to
//! "fix" it: once a non-NA-missing cell is hit in a row with
//! `skipna = false`, the remaining columns of *that row* are left
//! untouched, and every later row of the same group+column is poisoned
//! to NA from then on.

use crate::accum::KahanSum;
use crate::element::Na;
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};
use std::ops::{Add, Sub};

#[allow(clippy::too_many_arguments)]
pub fn group_cumsum<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    skipna: bool,
    out: &mut [T],
) -> KernelResult<()>
where
    T: Na + Copy + Default + Add<Output = T> + Sub<Output = T>,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_cumsum", n_rows, k_cols, ngroups, is_datetimelike, skipna);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, n_rows, k_cols);

    let na_fill = T::na_repr(is_datetimelike).unwrap_or_default();
    let mut running = vec![KahanSum::<T>::new(); ngroups * k_cols];
    let mut poisoned = vec![false; ngroups * k_cols];

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            for j in 0..k_cols {
                out_view.set(i, j, na_fill);
            }
            continue;
        }
        let g = lab as usize;
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            if poisoned[idx] {
                out_view.set(i, j, na_fill);
                continue;
            }
            let v = values.get(i, j);
            if crate::element::is_na_masked(v, is_datetimelike, mask_bit(mask.as_ref(), i, j)) {
                out_view.set(i, j, na_fill);
                if !skipna {
                    poisoned[idx] = true;
                    break; // remaining columns in this row are left untouched
                }
            } else {
                running[idx].add(v);
                out_view.set(i, j, running[idx].sum);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cumsum_preserves_order_and_resets_per_group() {
        let values = [1.0f64, 10.0, 2.0, 20.0, 3.0];
        let labels = [0isize, 1, 0, 1, 0];
        let mut out = [0.0f64; 5];
        group_cumsum(&values, &labels, None, 5, 1, 2, false, true, &mut out).unwrap();
        assert_eq!(out, [1.0, 10.0, 3.0, 30.0, 6.0]);
    }

    #[test]
    fn cumsum_matches_group_sum_at_the_last_row_of_a_group() {
        // spec.md §8 property 6
        use crate::reduce::group_sum;
        let values = [3.0f64, 1.0, 4.0, 1.0, 5.0];
        let labels = [0isize; 5];
        let mut cum = [0.0f64; 5];
        group_cumsum(&values, &labels, None, 5, 1, 1, false, true, &mut cum).unwrap();
        let mut total = [0.0f64; 1];
        let mut counts = [0i64; 1];
        group_sum(&values, &labels, None, 5, 1, 1, false, 0, &mut total, &mut counts, None)
            .unwrap();
        assert_abs_diff_eq!(cum[4], total[0], epsilon = 1e-9);
    }

    #[test]
    fn non_skipna_poisons_every_later_row_in_the_group() {
        let values = [1.0f64, f64::NAN, 2.0, 3.0];
        let labels = [0isize; 4];
        let mut out = [0.0f64; 4];
        group_cumsum(&values, &labels, None, 4, 1, 1, false, false, &mut out).unwrap();
        assert_eq!(out[0], 1.0);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
    }
}
