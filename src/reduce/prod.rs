//! `group_prod`: running per-group product, `spec.md` §4.4. Only
//! floating-point element types are supported (the spec is explicit
//! that `group_prod` is floating-only, unlike `group_sum`).

use crate::element::{FloatElement, Na};
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};
use crate::mincount::{as_given, finalize_cell};

#[allow(clippy::too_many_arguments)]
pub fn group_prod<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    min_count: i64,
    out: &mut [T],
    counts: &mut [i64],
    mut result_mask: Option<&mut [bool]>,
) -> KernelResult<()>
where
    T: Na + FloatElement + Copy + std::ops::Mul<Output = T> + num_traits::One,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_prod", n_rows, k_cols, ngroups, min_count);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, ngroups, k_cols);

    let mut prods = vec![T::one(); ngroups * k_cols];
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
            if crate::element::is_na_masked(v, false, mask_bit(mask.as_ref(), i, j)) {
                continue;
            }
            let idx = g * k_cols + j;
            prods[idx] = prods[idx] * v;
            n_obs[idx] += 1;
        }
    }

    let min_count = as_given(min_count);
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            let rm_cell = result_mask.as_deref_mut().map(|rm| &mut rm[idx]);
            let value = finalize_cell(g, j, n_obs[idx], min_count, prods[idx], false, rm_cell)?;
            out_view.set(g, j, value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_skips_na() {
        let values = [2.0f64, f64::NAN, 3.0, 4.0];
        let labels = [0isize, 0, 0, 1];
        let mut out = [0.0f64; 2];
        let mut counts = [0i64; 2];
        group_prod(&values, &labels, None, 4, 1, 2, 0, &mut out, &mut counts, None).unwrap();
        assert_eq!(out[0], 6.0);
        assert_eq!(out[1], 4.0);
    }
}
