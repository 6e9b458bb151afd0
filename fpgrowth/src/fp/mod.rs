pub mod builder;
pub mod error;
pub mod growth;
pub mod io;
pub mod streaming_growth;
pub mod tree;
pub mod utils;

#[cfg(test)]
mod tests;

/// Item identifier. Also the column index in a binary transaction matrix.
pub type Item = usize;

pub use builder::{SupportTable, build_fp_tree, first_scan, matrix_to_transactions, min_count};
pub use error::FpError;
pub use growth::{
    FpSearch, FrequentItemset, SearchConfig, fp_growth_algorithm, fp_search, mine,
    mine_with_config, project, sort_itemsets,
};
pub use streaming_growth::{
    ProcessingPhase, StreamingState, build_pass, count_pass, finalize_building, finalize_counts,
    mine_patterns,
};
pub use tree::{FPNode, FPTree, NodeId};
pub use utils::{FrequentLevel, ItemsetStorage, group_by_level};
