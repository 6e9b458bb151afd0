pub mod mining;
pub mod projection;
pub mod search;

pub use mining::{fp_growth_algorithm, mine, mine_with_config};
pub use projection::project;
pub use search::{FpSearch, FrequentItemset, SearchConfig, fp_search, sort_itemsets};
