//! Crate-wide error taxonomy for the aggregation kernels.
//!
//! Every kernel validates its arguments synchronously, before any write
//! to `out`/`counts`/`result_mask`, and returns a `KernelError` rather
//! than panicking or aborting the process. The one exception named by
//! the kernels themselves is `EmptyGroupUnsignedError`, which can only
//! be detected once the accumulation pass has finished (see the
//! `finalize` helpers in `mincount.rs`).

use thiserror::Error;

/// The kinds of failure a kernel can report. No variant is retried or
/// swallowed internally; callers see exactly what went wrong.
#[derive(Debug, Error, PartialEq)]
pub enum KernelError {
    #[error("length mismatch: values has {values_rows} rows but labels has {labels_len}")]
    LengthMismatch { values_rows: usize, labels_len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "group {group} column {col} has no valid observations; this element type has no in-band NA representation, supply a result_mask"
    )]
    EmptyGroupUnsignedError { group: usize, col: usize },

    #[error("element type {0} is not supported by this kernel")]
    UnsupportedElementType(&'static str),
}

pub type KernelResult<T> = Result<T, KernelError>;

/// Check that `values_rows == labels_len`, the one length invariant
/// every kernel shares. Must be called before any other validation or
/// write, per `spec.md` §6.
pub fn validate_lengths(values_rows: usize, labels_len: usize) -> KernelResult<()> {
    if values_rows != labels_len {
        return Err(KernelError::LengthMismatch { values_rows, labels_len });
    }
    Ok(())
}

/// Check that every probability in `qs` lies in `[0, 1]`, per
/// `group_quantile`'s entry validation.
pub fn validate_quantiles(qs: &[f64]) -> KernelResult<()> {
    for &q in qs {
        if !(0.0..=1.0).contains(&q) {
            return Err(KernelError::InvalidArgument(format!(
                "quantile probability {q} is outside [0, 1]"
            )));
        }
    }
    Ok(())
}

/// Check OHLC's fixed shape contract: single input column, four output
/// columns.
pub fn validate_ohlc_shape(k_cols: usize, out_cols: usize) -> KernelResult<()> {
    if k_cols != 1 {
        return Err(KernelError::InvalidArgument(format!(
            "group_ohlc requires K == 1 input column, got {k_cols}"
        )));
    }
    if out_cols != 4 {
        return Err(KernelError::InvalidArgument(format!(
            "group_ohlc requires 4 output columns (open, high, low, close), got {out_cols}"
        )));
    }
    Ok(())
}
