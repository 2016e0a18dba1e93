//! `group_var`: Welford per-group variance, `spec.md` §4.6. Output is
//! always `f64` regardless of input element type. Default `ddof = 1`.

use crate::accum::Welford;
use crate::element::{Na, ToF64};
use crate::error::{validate_lengths, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView};
use crate::mincount::at_least_ddof_plus_one;

#[allow(clippy::too_many_arguments)]
pub fn group_var<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    ddof: u64,
    out: &mut [f64],
    counts: &mut [i64],
) -> KernelResult<()>
where
    T: Na + Copy + ToF64,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_var", n_rows, k_cols, ngroups, is_datetimelike, ddof);
    let values = MatrixView::new(values, n_rows, k_cols);

    let mut welford = vec![Welford::new(); ngroups * k_cols];
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
            welford[idx].update(v.to_f64(), n_obs[idx]);
            n_obs[idx] += 1;
        }
    }

    let min_count = at_least_ddof_plus_one(ddof);
    for g in 0..ngroups {
        for j in 0..k_cols {
            let idx = g * k_cols + j;
            out[idx] = if n_obs[idx] >= min_count {
                welford[idx].variance(n_obs[idx], ddof)
            } else {
                f64::NAN
            };
        }
    }
    Ok(())
}
