use ndarray::ArrayView2;
use tracing::info;

use super::search::{FrequentItemset, SearchConfig, fp_search};
use crate::fp::Item;
use crate::fp::builder::{build_fp_tree, matrix_to_transactions, min_count};
use crate::fp::error::FpError;
use crate::fp::utils::{FrequentLevel, group_by_level};

/// Every itemset of `transactions` with support of at least `epsilon`.
pub fn mine(transactions: &[Vec<Item>], epsilon: f64) -> Result<Vec<FrequentItemset>, FpError> {
    mine_with_config(transactions, SearchConfig::new(epsilon)?)
}

pub fn mine_with_config(
    transactions: &[Vec<Item>],
    config: SearchConfig,
) -> Result<Vec<FrequentItemset>, FpError> {
    let (fp_tree, table) = build_fp_tree(transactions, config.epsilon);
    info!(
        transactions = transactions.len(),
        frequent_items = table.len(),
        nodes = fp_tree.len(),
        "mining frequent itemsets"
    );
    fp_search(fp_tree, config).collect()
}

/// Mines a binary transaction matrix with a relative `min_support` and
/// groups the result by itemset size.
pub fn fp_growth_algorithm(
    transactions: ArrayView2<i32>,
    min_support: f64,
) -> Result<Vec<FrequentLevel>, FpError> {
    let epsilon = min_count(min_support, transactions.nrows())?;
    let itemsets = mine(&matrix_to_transactions(transactions), epsilon)?;
    Ok(group_by_level(itemsets))
}
