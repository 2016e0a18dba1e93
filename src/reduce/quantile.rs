//! `group_quantile`, `spec.md` §4.11. Single input column (mirrors
//! `group_ohlc`'s K=1 restriction and the donor groupby kernel this is
//! modeled on, which likewise quantiles one column per call); output
//! shape is `ngroups x qs.len()`.

use crate::element::{Na, ToF64};
use crate::error::{validate_lengths, validate_quantiles, KernelError, KernelResult};
use crate::matrix::{mask_bit, MaskView};
use crate::select::stable_label_argsort;

/// The five interpolation modes named in `spec.md` §4.11.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Linear,
    Lower,
    Higher,
    Nearest,
    Midpoint,
}

impl TryFrom<&str> for Interpolation {
    type Error = KernelError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "linear" => Ok(Interpolation::Linear),
            "lower" => Ok(Interpolation::Lower),
            "higher" => Ok(Interpolation::Higher),
            "nearest" => Ok(Interpolation::Nearest),
            "midpoint" => Ok(Interpolation::Midpoint),
            other => Err(KernelError::InvalidArgument(format!(
                "unrecognized interpolation mode {other:?}"
            ))),
        }
    }
}

/// Build a default `sort_indexer`: rows ordered first by label, then
/// by value ascending within a group, with NA rows moved to the tail
/// of their group's span. `group_quantile` otherwise expects the
/// caller to supply this (`spec.md` §4.11's "additionally includes a
/// precomputed sort permutation"); this is the crate's own, since the
/// ordering collaborator is cheap to provide correctly once and reused
/// by every caller that does not already have one from an upstream
/// sort.
pub fn default_sort_indexer<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    is_datetimelike: bool,
) -> Vec<usize>
where
    T: Na + ToF64 + Copy,
{
    let mut idx = stable_label_argsort(labels);
    // stable_label_argsort already groups by label; now sort each
    // group's span by value ascending, NA to the tail.
    let neg1_count = labels.iter().filter(|&&l| l < 0).count();
    let mut start = neg1_count;
    let mut g = if start < idx.len() { labels[idx[start]] } else { -1 };
    while start < idx.len() {
        let mut end = start;
        while end < idx.len() && labels[idx[end]] == g {
            end += 1;
        }
        idx[start..end].sort_by(|&a, &b| {
            let na_a = crate::element::is_na_masked(values[a], is_datetimelike, mask_bit(mask.as_ref(), a, 0));
            let na_b = crate::element::is_na_masked(values[b], is_datetimelike, mask_bit(mask.as_ref(), b, 0));
            match (na_a, na_b) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => values[a].to_f64().partial_cmp(&values[b].to_f64()).unwrap(),
            }
        });
        start = end;
        if start < idx.len() {
            g = labels[idx[start]];
        }
    }
    idx
}

#[allow(clippy::too_many_arguments)]
pub fn group_quantile<T>(
    values: &[T],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    ngroups: usize,
    is_datetimelike: bool,
    sort_indexer: &[usize],
    qs: &[f64],
    interpolation: Interpolation,
    out: &mut [f64],
    counts: &mut [i64],
) -> KernelResult<()>
where
    T: Na + ToF64 + Copy,
{
    validate_quantiles(qs)?;
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_quantile", n_rows, ngroups, is_datetimelike, ?interpolation, n_qs = qs.len());

    let mut non_na_counts = vec![0u64; ngroups];
    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            continue;
        }
        let g = lab as usize;
        counts[g] += 1;
        if !crate::element::is_na_masked(values[i], is_datetimelike, mask_bit(mask.as_ref(), i, 0)) {
            non_na_counts[g] += 1;
        }
    }

    let nq = qs.len();
    let mut grp_start = 0usize;
    for g in 0..ngroups {
        let m = non_na_counts[g] as usize;
        if m == 0 {
            for qi in 0..nq {
                out[g * nq + qi] = f64::NAN;
            }
        } else {
            for (qi, &q) in qs.iter().enumerate() {
                out[g * nq + qi] =
                    quantile_at(values, sort_indexer, grp_start, m, q, interpolation);
            }
        }
        grp_start += counts[g] as usize;
    }
    Ok(())
}

#[inline]
fn quantile_at<T: ToF64 + Copy>(
    values: &[T],
    sort_indexer: &[usize],
    grp_start: usize,
    m: usize,
    q: f64,
    interpolation: Interpolation,
) -> f64 {
    let pos = q * (m as f64 - 1.0);
    let idx_offset = pos.floor() as usize;
    let frac = pos - idx_offset as f64;
    let v = values[sort_indexer[grp_start + idx_offset]].to_f64();
    if frac == 0.0 || interpolation == Interpolation::Lower {
        return v;
    }
    let v2 = values[sort_indexer[grp_start + idx_offset + 1]].to_f64();
    match interpolation {
        Interpolation::Linear => v + (v2 - v) * frac,
        Interpolation::Higher => v2,
        Interpolation::Midpoint => (v + v2) / 2.0,
        Interpolation::Nearest => {
            if frac > 0.5 || (frac == 0.5 && q > 0.5) {
                v2
            } else {
                v
            }
        }
        Interpolation::Lower => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_quantile_at_one_half_matches_spec_scenario() {
        // spec.md §8 scenario 5
        let values = [1.0f64, 2.0, 3.0, 4.0];
        let labels = [0isize; 4];
        let sort_indexer = default_sort_indexer(&values, &labels, None, false);
        let mut out = [0.0f64; 1];
        let mut counts = [0i64; 1];
        group_quantile(
            &values,
            &labels,
            None,
            4,
            1,
            false,
            &sort_indexer,
            &[0.5],
            Interpolation::Linear,
            &mut out,
            &mut counts,
        )
        .unwrap();
        assert_eq!(out[0], 2.5);
    }

    #[test]
    fn endpoints_return_min_and_max_for_every_interpolation_mode() {
        // spec.md §8 property 8
        let values = [5.0f64, 1.0, 3.0, 2.0, 4.0];
        let labels = [0isize; 5];
        let sort_indexer = default_sort_indexer(&values, &labels, None, false);
        for &mode in &[
            Interpolation::Linear,
            Interpolation::Lower,
            Interpolation::Higher,
            Interpolation::Nearest,
            Interpolation::Midpoint,
        ] {
            let mut out = [0.0f64; 2];
            let mut counts = [0i64; 1];
            group_quantile(
                &values,
                &labels,
                None,
                5,
                1,
                false,
                &sort_indexer,
                &[0.0, 1.0],
                mode,
                &mut out,
                &mut counts,
            )
            .unwrap();
            assert_eq!(out[0], 1.0, "q=0 should be the min under {mode:?}");
            assert_eq!(out[1], 5.0, "q=1 should be the max under {mode:?}");
        }
    }

    #[test]
    fn out_of_range_probability_is_rejected_before_any_computation() {
        let values = [1.0f64];
        let labels = [0isize];
        let mut out = [0.0f64; 1];
        let mut counts = [0i64; 1];
        let err = group_quantile(
            &values,
            &labels,
            None,
            1,
            1,
            false,
            &[0],
            &[1.5],
            Interpolation::Linear,
            &mut out,
            &mut counts,
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::InvalidArgument(_)));
        assert_eq!(counts[0], 0, "no accumulation should have happened");
    }
}
