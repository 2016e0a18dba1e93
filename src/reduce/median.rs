//! `group_median`, `spec.md` §4.10. Gathers each group's non-NA column
//! values into a contiguous scratch span (via `stable_label_argsort`)
//! so `kth_smallest` can partition it in place, replacing the donor
//! pattern of raw pointer arithmetic over a gathered buffer with an
//! index-window `scratch[start..start+n]` recomputed per group
//! (`spec.md` §9's redesign note).

use crate::element::{Na, ToF64};
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView};
use crate::select::{kth_smallest, stable_label_argsort};

pub fn group_median<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    out: &mut [f64],
    counts: &mut [i64],
) -> KernelResult<()>
where
    T: Na + ToF64 + Copy,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_median", n_rows, k_cols, ngroups, is_datetimelike);
    let values = MatrixView::new(values, n_rows, k_cols);

    // group rows by label into contiguous spans of `order`.
    let mut group_len = vec![0usize; ngroups];
    let mut neg1_count = 0usize;
    for &lab in labels {
        if lab < 0 {
            neg1_count += 1;
        } else {
            group_len[lab as usize] += 1;
            counts[lab as usize] += 1;
        }
    }
    let mut offsets = vec![0usize; ngroups + 1];
    offsets[0] = neg1_count;
    for g in 0..ngroups {
        offsets[g + 1] = offsets[g] + group_len[g];
    }
    let order = stable_label_argsort(labels);

    let mut scratch: Vec<f64> = Vec::new();
    for j in 0..k_cols {
        for g in 0..ngroups {
            let span = &order[offsets[g]..offsets[g + 1]];
            scratch.clear();
            for &row in span {
                let v = values.get(row, j);
                if !crate::element::is_na_masked(v, is_datetimelike, mask_bit(mask.as_ref(), row, j))
                {
                    scratch.push(v.to_f64());
                }
            }
            let n = scratch.len();
            out[g * k_cols + j] = if n == 0 {
                f64::NAN
            } else if n % 2 == 1 {
                kth_smallest(&mut scratch, n / 2)
            } else {
                let hi = kth_smallest(&mut scratch, n / 2);
                let lo = kth_smallest(&mut scratch, n / 2 - 1);
                (lo + hi) / 2.0
            };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_and_even_sized_groups() {
        let values = [1.0f64, 2.0, 3.0, 10.0, 20.0, 30.0, 40.0];
        let labels = [0isize, 0, 0, 1, 1, 1, 1];
        let mut out = [0.0f64; 2];
        let mut counts = [0i64; 2];
        group_median(&values, &labels, None, 7, 1, 2, false, &mut out, &mut counts).unwrap();
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1], 25.0);
        assert_eq!(counts, [3, 4]);
    }

    #[test]
    fn median_skips_na_and_empty_group_is_nan() {
        let values = [1.0f64, f64::NAN, 3.0];
        let labels = [0isize, 0, 1];
        let mut out = [0.0f64; 2];
        let mut counts = [0i64; 2];
        group_median(&values, &labels, None, 3, 1, 2, false, &mut out, &mut counts).unwrap();
        assert_eq!(out[0], 1.0);
        assert_eq!(out[1], 3.0);
    }
}
