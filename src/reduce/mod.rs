//! Reducer kernels: each consumes a row-partitioned value matrix and
//! produces one aggregate per group per column. `spec.md` §4.2's
//! shared two-phase accumulate/finalize skeleton underlies every
//! kernel in this module; see `crate::mincount` for the shared
//! finalize helper.

pub mod any_all;
pub mod first_last_nth;
pub mod mean;
pub mod median;
pub mod minmax;
pub mod ohlc;
pub mod prod;
pub mod quantile;
pub mod sum;
pub mod var;

pub use any_all::{group_any_all, ValTest};
pub use first_last_nth::{group_first, group_last, group_last_obj, group_nth, group_nth_obj};
pub use mean::group_mean;
pub use median::group_median;
pub use minmax::{group_max, group_min};
pub use ohlc::group_ohlc;
pub use prod::group_prod;
pub use quantile::{default_sort_indexer, group_quantile, Interpolation};
pub use sum::{group_sum, group_sum_obj};
pub use var::group_var;
