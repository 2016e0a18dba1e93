//! Order-statistic and grouping helpers that `spec.md` §2 treats as
//! external collaborators ("assumed provided: a partial-sort
//! `kth_smallest(a, k, n)`, a stable argsort of labels, ..."). Rather
//! than hand-roll a quickselect, `kth_smallest` is built directly on
//! `slice::select_nth_unstable_by`, which already provides exactly
//! that contract in `core`. `stable_label_argsort` is the one
//! collaborator `group_median` needs internally per its own algorithm
//! note in `spec.md` §4.10, so it is implemented once and shared with
//! `group_quantile` as a convenience default `sort_indexer` producer.

/// Return the `k`-th smallest element (0-based) of `a`, partitioning
/// `a` in place. `spec.md` §4.10 calls this `kth_smallest(a, k, n)`.
pub fn kth_smallest(a: &mut [f64], k: usize) -> f64 {
    let (_, &mut median, _) = a.select_nth_unstable_by(k, |x, y| x.partial_cmp(y).unwrap());
    median
}

/// A stable argsort of `labels` that orders rows first by label
/// (ascending, `-1` rows sorted first since they are always excluded
/// downstream) then preserves original row order within each label
/// (`spec.md` §4.10: "gather values by group into contiguous spans via
/// the partition index produced by a stable argsort of labels").
pub fn stable_label_argsort(labels: &[isize]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..labels.len()).collect();
    idx.sort_by_key(|&i| labels[i]);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kth_smallest_finds_median_of_odd_length() {
        let mut a = vec![5.0, 1.0, 3.0, 2.0, 4.0];
        assert_eq!(kth_smallest(&mut a, 2), 3.0);
    }

    #[test]
    fn stable_label_argsort_groups_contiguously_preserving_order() {
        let labels = [1isize, 0, 1, -1, 0];
        let idx = stable_label_argsort(&labels);
        // -1 group first, then label 0 rows in original order, then label 1
        assert_eq!(idx, vec![3, 1, 4, 0, 2]);
    }
}
