//! `group_rank`, `spec.md` §4.17. The kernel's own job is trivial: for
//! each column, hand the group-aware ranking problem to an external
//! collaborator and copy the result back. `RankRoutine` is that
//! collaborator's contract; `DefaultRank` is the crate's own
//! implementation of it; because "dedicated, non-generic entry points"
//! for object columns don't make sense for a numeric ranking op, this
//! stays generic over `Na + ToF64`, matching every other f64-producing
//! reducer in this crate.

use crate::element::{Na, ToF64};
use crate::error::{validate_lengths, KernelError, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiesMethod {
    Average,
    Min,
    Max,
    First,
    Dense,
}

impl TryFrom<&str> for TiesMethod {
    type Error = KernelError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "average" => Ok(TiesMethod::Average),
            "min" => Ok(TiesMethod::Min),
            "max" => Ok(TiesMethod::Max),
            "first" => Ok(TiesMethod::First),
            "dense" => Ok(TiesMethod::Dense),
            other => Err(KernelError::InvalidArgument(format!("unrecognized ties_method {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaOption {
    Keep,
    Top,
    Bottom,
}

impl TryFrom<&str> for NaOption {
    type Error = KernelError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "keep" => Ok(NaOption::Keep),
            "top" => Ok(NaOption::Top),
            "bottom" => Ok(NaOption::Bottom),
            other => Err(KernelError::InvalidArgument(format!("unrecognized na_option {other:?}"))),
        }
    }
}

/// The external 1-D rank routine `group_rank` delegates to, per
/// `spec.md` §2's list of assumed-provided collaborators. A caller
/// embedding this crate in a larger engine that already owns a rank
/// implementation (e.g. one shared with a non-grouped `rank` op) can
/// supply its own; `DefaultRank` below is this crate's.
#[allow(clippy::too_many_arguments)]
pub trait RankRoutine<T> {
    fn rank_within_group(
        &self,
        group_values: &[T],
        is_na: &[bool],
        ties_method: TiesMethod,
        ascending: bool,
        pct: bool,
        na_option: NaOption,
        out: &mut [f64],
    );
}

/// This crate's own `RankRoutine`. `group_values`/`is_na`/`out` are all
/// restricted to a single group's rows, in original row order.
pub struct DefaultRank;

impl<T: ToF64 + Copy> RankRoutine<T> for DefaultRank {
    fn rank_within_group(
        &self,
        group_values: &[T],
        is_na: &[bool],
        ties_method: TiesMethod,
        ascending: bool,
        pct: bool,
        na_option: NaOption,
        out: &mut [f64],
    ) {
        let n = group_values.len();
        let valid: Vec<usize> = (0..n).filter(|&i| !is_na[i]).collect();
        let na_idx: Vec<usize> = (0..n).filter(|&i| is_na[i]).collect();
        let m = valid.len();
        let c = na_idx.len();

        let vals: Vec<f64> = valid.iter().map(|&i| group_values[i].to_f64()).collect();
        let ranks = rank_values(&vals, ascending, ties_method);

        let total = match na_option {
            NaOption::Keep => m,
            NaOption::Top | NaOption::Bottom => m + c,
        } as f64;

        match na_option {
            NaOption::Keep => {
                for &i in &na_idx {
                    out[i] = f64::NAN;
                }
                for (k, &i) in valid.iter().enumerate() {
                    out[i] = ranks[k];
                }
            }
            NaOption::Top => {
                for (order, &i) in na_idx.iter().enumerate() {
                    out[i] = (order + 1) as f64;
                }
                for (k, &i) in valid.iter().enumerate() {
                    out[i] = ranks[k] + c as f64;
                }
            }
            NaOption::Bottom => {
                for (k, &i) in valid.iter().enumerate() {
                    out[i] = ranks[k];
                }
                for (order, &i) in na_idx.iter().enumerate() {
                    out[i] = (m + order + 1) as f64;
                }
            }
        }

        if pct {
            for &i in &valid {
                out[i] /= total;
            }
            if !matches!(na_option, NaOption::Keep) {
                for &i in &na_idx {
                    out[i] /= total;
                }
            }
        }
    }
}

/// Rank a flat (already NA-free) slice. Ties within equal values are
/// resolved per `ties_method`; `First` relies on `sort_by`'s stability
/// to break ties by original position, matching every other method's
/// "first observation order" convention used elsewhere in this crate.
fn rank_values(vals: &[f64], ascending: bool, ties_method: TiesMethod) -> Vec<f64> {
    let n = vals.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let ord = vals[a].partial_cmp(&vals[b]).unwrap();
        if ascending { ord } else { ord.reverse() }
    });

    let mut ranks = vec![0.0f64; n];
    if ties_method == TiesMethod::First {
        for (pos, &i) in order.iter().enumerate() {
            ranks[i] = (pos + 1) as f64;
        }
        return ranks;
    }

    let mut dense = 0.0f64;
    let mut i = 0usize;
    while i < n {
        let mut j = i;
        while j + 1 < n && vals[order[j + 1]] == vals[order[i]] {
            j += 1;
        }
        dense += 1.0;
        let min_r = (i + 1) as f64;
        let max_r = (j + 1) as f64;
        let avg_r = (min_r + max_r) / 2.0;
        for &pos in &order[i..=j] {
            ranks[pos] = match ties_method {
                TiesMethod::Min => min_r,
                TiesMethod::Max => max_r,
                TiesMethod::Average => avg_r,
                TiesMethod::Dense => dense,
                TiesMethod::First => unreachable!(),
            };
        }
        i = j + 1;
    }
    ranks
}

#[allow(clippy::too_many_arguments)]
pub fn group_rank<T, R>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    is_datetimelike: bool,
    ties_method: TiesMethod,
    ascending: bool,
    pct: bool,
    na_option: NaOption,
    routine: &R,
    out: &mut [f64],
) -> KernelResult<()>
where
    T: Na + Copy,
    R: RankRoutine<T>,
{
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_rank", n_rows, k_cols, ngroups, is_datetimelike, ?ties_method, ascending, pct, ?na_option);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, n_rows, k_cols);

    let mut group_rows: Vec<Vec<usize>> = vec![Vec::new(); ngroups];
    for (i, &lab) in labels.iter().enumerate() {
        if lab >= 0 {
            group_rows[lab as usize].push(i);
        }
    }

    for j in 0..k_cols {
        for rows in &group_rows {
            let col_vals: Vec<T> = rows.iter().map(|&i| values.get(i, j)).collect();
            let is_na: Vec<bool> = rows
                .iter()
                .map(|&i| {
                    crate::element::is_na_masked(values.get(i, j), is_datetimelike, mask_bit(mask.as_ref(), i, j))
                })
                .collect();
            let mut group_out = vec![0.0f64; rows.len()];
            routine.rank_within_group(&col_vals, &is_na, ties_method, ascending, pct, na_option, &mut group_out);
            for (k, &i) in rows.iter().enumerate() {
                out_view.set(i, j, group_out[k]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_ties_within_a_group() {
        let values = [1.0f64, 2.0, 2.0, 3.0];
        let labels = [0isize; 4];
        let mut out = [0.0f64; 4];
        group_rank(
            &values, &labels, None, 4, 1, 1, false, TiesMethod::Average, true, false, NaOption::Keep,
            &DefaultRank, &mut out,
        )
        .unwrap();
        assert_eq!(out, [1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn dense_ties_have_no_gaps() {
        let values = [1.0f64, 2.0, 2.0, 3.0];
        let labels = [0isize; 4];
        let mut out = [0.0f64; 4];
        group_rank(
            &values, &labels, None, 4, 1, 1, false, TiesMethod::Dense, true, false, NaOption::Keep,
            &DefaultRank, &mut out,
        )
        .unwrap();
        assert_eq!(out, [1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn na_option_top_gives_masked_cells_the_lowest_ranks() {
        let values = [5.0f64, f64::NAN, 1.0];
        let labels = [0isize; 3];
        let mut out = [0.0f64; 3];
        group_rank(
            &values, &labels, None, 3, 1, 1, false, TiesMethod::Average, true, false, NaOption::Top,
            &DefaultRank, &mut out,
        )
        .unwrap();
        assert_eq!(out[1], 1.0);
        assert_eq!(out[2], 2.0);
        assert_eq!(out[0], 3.0);
    }

    #[test]
    fn ranking_is_independent_per_group() {
        let values = [10.0f64, 20.0, 1.0, 2.0];
        let labels = [0isize, 0, 1, 1];
        let mut out = [0.0f64; 4];
        group_rank(
            &values, &labels, None, 4, 1, 2, false, TiesMethod::First, true, false, NaOption::Keep,
            &DefaultRank, &mut out,
        )
        .unwrap();
        assert_eq!(out, [1.0, 2.0, 1.0, 2.0]);
    }
}
