//! `group_shift_indexer`, `spec.md` §4.15. Builds an index permutation
//! rather than moving any values itself; the caller performs the
//! actual take/gather with the returned indices.

use crate::error::{validate_lengths, KernelResult};

/// `out[i]` is the input row whose value should appear at row `i`
/// after shifting by `periods` within each group (negative = backward,
/// positive = forward, `0` is rejected as meaningless by the caller
/// convention, not by this function). Rows with `labels[i] == -1` map
/// to `-1`.
pub fn group_shift_indexer(
    labels: &[isize],
    ngroups: usize,
    periods: i64,
    out: &mut [isize],
) -> KernelResult<()> {
    validate_lengths(labels.len(), out.len())?;
    tracing::trace!(kernel = "group_shift_indexer", n_rows = labels.len(), ngroups, periods);
    let (abs_periods, reverse) = if periods < 0 { ((-periods) as usize, true) } else { (periods as usize, false) };
    if abs_periods == 0 {
        // degenerate: a shift of 0 is the identity permutation.
        for (i, &l) in labels.iter().enumerate() {
            out[i] = if l < 0 { -1 } else { i as isize };
        }
        return Ok(());
    }

    let n = labels.len();
    let mut label_seen = vec![0u64; ngroups];
    let mut label_indexer = vec![-1isize; ngroups * abs_periods];

    let indices: Box<dyn Iterator<Item = usize>> =
        if reverse { Box::new((0..n).rev()) } else { Box::new(0..n) };

    for i in indices {
        let lab = labels[i];
        if lab < 0 {
            out[i] = -1;
            continue;
        }
        let g = lab as usize;
        label_seen[g] += 1;
        let slot = (label_seen[g] as usize) % abs_periods;
        let ring_idx = g * abs_periods + slot;
        out[i] = if label_seen[g] as usize > abs_periods { label_indexer[ring_idx] } else { -1 };
        label_indexer[ring_idx] = i as isize;
    }
    Ok(())
}
