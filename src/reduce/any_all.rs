//! `group_any_all`, `spec.md` §4.12. Kleene three-valued logic when
//! `nullable = true`: the output uses `{0, 1, -1}` where `-1` means
//! "undetermined" (a masked cell was seen and no decisive value has
//! been seen yet).

use crate::error::{validate_lengths, KernelError, KernelResult};
use crate::matrix::{mask_bit, MaskView, MatrixView, MatrixViewMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValTest {
    Any,
    All,
}

impl TryFrom<&str> for ValTest {
    type Error = KernelError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "any" => Ok(ValTest::Any),
            "all" => Ok(ValTest::All),
            other => Err(KernelError::InvalidArgument(format!("val_test must be any/all, got {other:?}"))),
        }
    }
}

impl ValTest {
    fn flag_val(self) -> i8 {
        match self {
            ValTest::Any => 1,
            ValTest::All => 0,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn group_any_all(
    values: &[i8],
    labels: &[isize],
    mask: Option<MaskView<'_>>,
    n_rows: usize,
    k_cols: usize,
    ngroups: usize,
    val_test: ValTest,
    skipna: bool,
    nullable: bool,
    out: &mut [i8],
) -> KernelResult<()> {
    validate_lengths(n_rows, labels.len())?;
    tracing::trace!(kernel = "group_any_all", n_rows, k_cols, ngroups, ?val_test, skipna, nullable);
    let values = MatrixView::new(values, n_rows, k_cols);
    let mut out_view = MatrixViewMut::new(out, ngroups, k_cols);

    let flag_val = val_test.flag_val();
    for g in 0..ngroups {
        for j in 0..k_cols {
            out_view.set(g, j, 1 - flag_val);
        }
    }

    for i in 0..n_rows {
        let lab = labels[i];
        if lab < 0 {
            continue;
        }
        let g = lab as usize;
        for j in 0..k_cols {
            let is_masked = mask_bit(mask.as_ref(), i, j).unwrap_or(false);
            if skipna && is_masked {
                continue;
            }
            let cur = out_view.get(g, j);
            if nullable && is_masked {
                if cur != flag_val {
                    out_view.set(g, j, -1);
                }
            } else if values.get(i, j) == flag_val {
                out_view.set(g, j, flag_val); // absorbing
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_with_kleene_logic_and_no_decisive_value() {
        // spec.md §8 scenario 7
        let values = [0i8, 0, 0];
        let labels = [0isize, 0, 0];
        let mask_data = [true, false, false];
        let mask = MatrixView::new(&mask_data, 3, 1);
        let mut out = [0i8; 1];
        group_any_all(&values, &labels, Some(mask), 3, 1, 1, ValTest::Any, false, true, &mut out)
            .unwrap();
        assert_eq!(out[0], -1);
    }

    #[test]
    fn any_with_decisive_true_absorbs_regardless_of_masked_cells() {
        let values = [0i8, 1, 0];
        let labels = [0isize, 0, 0];
        let mask_data = [true, false, false];
        let mask = MatrixView::new(&mask_data, 3, 1);
        let mut out = [0i8; 1];
        group_any_all(&values, &labels, Some(mask), 3, 1, 1, ValTest::Any, false, true, &mut out)
            .unwrap();
        assert_eq!(out[0], 1);
    }

    #[test]
    fn all_with_skipna_ignores_masked_cells() {
        let values = [1i8, 1, 0];
        let labels = [0isize, 0, 0];
        let mask_data = [false, false, true];
        let mask = MatrixView::new(&mask_data, 3, 1);
        let mut out = [0i8; 1];
        group_any_all(&values, &labels, Some(mask), 3, 1, 1, ValTest::All, true, false, &mut out)
            .unwrap();
        assert_eq!(out[0], 1); // only the two unmasked 1's were considered
    }
}
