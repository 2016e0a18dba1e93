//! `group_fillna_indexer`, `spec.md` §4.16. Produces a gather index,
//! same convention as `group_shift_indexer`: the caller performs the
//! actual take.

use crate::error::{validate_lengths, KernelResult};

/// `sorted_labels` is a stable argsort of `labels` (for `bfill` the
/// caller passes the reverse of that argsort, per the spec). `mask`
/// is true where a row is missing. `limit` bounds the number of
/// consecutive rows a single source index may fill forward (`-1`
/// means unbounded). `dropna`, when set, forces excluded rows
/// (`labels[i] == -1`) to map to `-1` rather than inheriting a fill.
pub fn group_fillna_indexer(
    labels: &[isize],
    sorted_labels: &[usize],
    mask: &[bool],
    limit: i64,
    dropna: bool,
    out: &mut [isize],
) -> KernelResult<()> {
    validate_lengths(labels.len(), mask.len())?;
    validate_lengths(labels.len(), out.len())?;
    tracing::trace!(kernel = "group_fillna_indexer", n_rows = labels.len(), limit, dropna);
    let n = sorted_labels.len();

    let mut curr_fill_idx: isize = -1;
    let mut filled_vals: i64 = 0;

    for pos in 0..n {
        let idx = sorted_labels[pos];
        let lab = labels[idx];
        if dropna && lab < 0 {
            curr_fill_idx = -1;
        } else if mask[idx] {
            if limit != -1 && filled_vals >= limit {
                curr_fill_idx = -1;
            }
            filled_vals += 1;
        } else {
            filled_vals = 0;
            curr_fill_idx = idx as isize;
        }
        out[idx] = curr_fill_idx;

        let last_in_group =
            pos == n - 1 || labels[sorted_labels[pos + 1]] != lab;
        if last_in_group {
            curr_fill_idx = -1;
            filled_vals = 0;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::stable_label_argsort;

    #[test]
    fn ffill_within_a_group_honors_limit() {
        let labels = [0isize, 0, 0, 0, 0];
        let mask = [false, true, true, true, false];
        let sorted = stable_label_argsort(&labels);
        let mut out = [0isize; 5];
        group_fillna_indexer(&labels, &sorted, &mask, 1, false, &mut out).unwrap();
        assert_eq!(out, [0, 0, -1, -1, 4]);
    }

    #[test]
    fn unbounded_limit_fills_the_whole_run() {
        let labels = [0isize, 0, 0, 0];
        let mask = [false, true, true, true];
        let sorted = stable_label_argsort(&labels);
        let mut out = [0isize; 4];
        group_fillna_indexer(&labels, &sorted, &mask, -1, false, &mut out).unwrap();
        assert_eq!(out, [0, 0, 0, 0]);
    }

    #[test]
    fn fill_does_not_cross_a_group_boundary() {
        let labels = [0isize, 0, 1, 1];
        let mask = [false, true, false, true];
        let sorted = stable_label_argsort(&labels);
        let mut out = [0isize; 4];
        group_fillna_indexer(&labels, &sorted, &mask, -1, false, &mut out).unwrap();
        assert_eq!(out, [0, 0, 2, 2]);
    }

    #[test]
    fn dropna_maps_excluded_rows_to_negative_one() {
        let labels = [-1isize, 0, 0];
        let mask = [true, false, true];
        let sorted = stable_label_argsort(&labels);
        let mut out = [0isize; 3];
        group_fillna_indexer(&labels, &sorted, &mask, -1, true, &mut out).unwrap();
        assert_eq!(out[0], -1);
        assert_eq!(out[2], 1);
    }
}
