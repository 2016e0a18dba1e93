//! Dense, NA-aware group-wise aggregation kernels.
//!
//! Every kernel in this crate consumes a row-partitioned value matrix
//! plus an integer label per row (`-1` meaning "this row belongs to no
//! group") and writes into a caller-preallocated output buffer. None of
//! them allocate their own input, none of them perform I/O, and none
//! of them retry or swallow an error: see [`error`] for the failure
//! taxonomy.
//!
//! - [`reduce`] — one aggregate per group per column: `sum`, `prod`,
//!   `mean`, `var`, `min`/`max`, `first`/`nth`/`last`, `ohlc`,
//!   `median`, `quantile`, `any`/`all`.
//! - [`scan`] — one output cell per input row: `cumsum`, `cumprod`,
//!   `cummin`, `cummax`.
//! - [`util`] — group-local index producers and ranking: `shift`,
//!   `fillna`, `rank`.
//!
//! [`element`] is the compile-time type-category dispatch layer
//! (`Na`, `OrdExtreme`, `DivByCount`, `ToF64`) that lets the same
//! generic kernel body serve every supported element type without a
//! runtime type tag. [`matrix`] centralizes the row-major stride
//! arithmetic; [`accum`] holds the two compensated accumulators
//! (Kahan sum, Welford mean/variance) shared across reducers and
//! scans; [`mincount`] holds the shared min-count/empty-group policy;
//! [`select`] holds the order-statistic helpers `group_median` and
//! `group_quantile` build on.

pub mod accum;
pub mod element;
pub mod error;
pub mod matrix;
pub mod mincount;
pub mod reduce;
pub mod scan;
pub mod select;
pub mod util;

pub use element::{Complex32, Complex64, DivByCount, FloatElement, Na, OrdExtreme, ToF64, NAT_SENTINEL};
pub use error::{KernelError, KernelResult};
pub use matrix::{MaskView, MatrixView, MatrixViewMut};

pub use reduce::{
    default_sort_indexer, group_any_all, group_first, group_last, group_last_obj, group_max,
    group_mean, group_median, group_min, group_nth, group_nth_obj, group_ohlc, group_prod,
    group_quantile, group_sum, group_sum_obj, group_var, Interpolation, ValTest,
};
pub use scan::{group_cummax, group_cummin, group_cumprod, group_cumsum};
pub use util::{group_fillna_indexer, group_rank, group_shift_indexer, DefaultRank, NaOption, RankRoutine, TiesMethod};
