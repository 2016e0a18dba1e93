//! `group_cumprod`, `spec.md` §4.13. Float-only, mirroring
//! `group_prod`'s restriction (a running product over integers
//! overflows far sooner than a sum does, and the donor's own `Agg`
//! never defines a product reducer at all). Same row-order and
//! poisoning rules as `group_cumsum`.

use crate::element::{FloatElement, Na};
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};

pub fn group_cumprod<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    skipna: bool,
    out: &mut [T],
) -> KernelResult<()>
where
    T: Na + FloatElement + Copy + Default + std::ops::Mul<Output = T> + From<u8>,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_cumprod", n_rows, k_cols, ngroups, skipna);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, n_rows, k_cols);

    let na_fill = T::na_repr(false).unwrap_or_default();
    let one: T = T::from(1u8);
    let mut running = vec![one; ngroups * k_cols];
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
            if crate::element::is_na_masked(v, false, mask_bit(mask.as_ref(), i, j)) {
                out_view.set(i, j, na_fill);
                if !skipna {
                    poisoned[idx] = true;
                    break;
                }
            } else {
                running[idx] = running[idx] * v;
                out_view.set(i, j, running[idx]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumprod_preserves_order_and_resets_per_group() {
        let values = [2.0f64, 10.0, 3.0, 10.0, 4.0];
        let labels = [0isize, 1, 0, 1, 0];
        let mut out = [0.0f64; 5];
        group_cumprod(&values, &labels, None, 5, 1, 2, true, &mut out).unwrap();
        assert_eq!(out, [2.0, 10.0, 6.0, 100.0, 24.0]);
    }

    #[test]
    fn non_skipna_poisons_every_later_row_in_the_group() {
        let values = [2.0f64, f64::NAN, 3.0];
        let labels = [0isize; 3];
        let mut out = [0.0f64; 3];
        group_cumprod(&values, &labels, None, 3, 1, 1, false, &mut out).unwrap();
        assert_eq!(out[0], 2.0);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
    }
}
