//! Group-local utilities: index-producing collaborators
//! (`group_shift_indexer`, `group_fillna_indexer`) and the thin
//! `group_rank` wrapper, `spec.md` §4.15–§4.17.

pub mod fillna;
pub mod rank;
pub mod shift;

pub use fillna::group_fillna_indexer;
pub use rank::{group_rank, DefaultRank, NaOption, RankRoutine, TiesMethod};
pub use shift::group_shift_indexer;
