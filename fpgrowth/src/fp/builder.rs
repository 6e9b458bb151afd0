use std::collections::HashMap;

use ndarray::ArrayView2;
use rayon::prelude::*;
use tracing::debug;

use super::Item;
use super::error::FpError;
use super::tree::FPTree;

/// Global supports of the frequent items, and their insertion order.
///
/// Items are ranked by descending support, ties broken by ascending item
/// id, so that every transaction is inserted in the same order and shares
/// as much prefix as possible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupportTable {
    pub frequent_items: Vec<Item>,
    supports: HashMap<Item, usize>,
    ranks: HashMap<Item, usize>,
}

impl SupportTable {
    /// Keeps the items of `counts` whose support reaches `epsilon`.
    pub fn from_counts(counts: &HashMap<Item, usize>, epsilon: f64) -> Self {
        let mut frequent: Vec<(Item, usize)> = counts
            .iter()
            .filter(|&(_, &count)| count as f64 >= epsilon)
            .map(|(&item, &count)| (item, count))
            .collect();

        frequent.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let ranks = frequent
            .iter()
            .enumerate()
            .map(|(rank, &(item, _))| (item, rank))
            .collect();

        Self {
            frequent_items: frequent.iter().map(|&(item, _)| item).collect(),
            supports: frequent.into_iter().collect(),
            ranks,
        }
    }

    pub fn support(&self, item: Item) -> Option<usize> {
        self.supports.get(&item).copied()
    }

    pub fn rank(&self, item: Item) -> Option<usize> {
        self.ranks.get(&item).copied()
    }

    pub fn is_frequent(&self, item: Item) -> bool {
        self.ranks.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.frequent_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequent_items.is_empty()
    }

    /// Drops infrequent and repeated items and sorts the rest by rank.
    pub fn order_transaction(&self, transaction: &[Item]) -> Vec<Item> {
        let mut ranked: Vec<(usize, Item)> = transaction
            .iter()
            .filter_map(|&item| self.rank(item).map(|rank| (rank, item)))
            .collect();

        ranked.sort_unstable();
        ranked.dedup();
        ranked.into_iter().map(|(_, item)| item).collect()
    }
}

/// Number of transactions containing each item. An item repeated within
/// one transaction counts once.
pub fn count_supports(transactions: &[Vec<Item>]) -> HashMap<Item, usize> {
    transactions
        .par_iter()
        .fold(HashMap::new, |mut counts, transaction| {
            let mut items = transaction.clone();
            items.sort_unstable();
            items.dedup();
            for item in items {
                *counts.entry(item).or_insert(0) += 1;
            }
            counts
        })
        .reduce(HashMap::new, merge_counts)
}

pub fn merge_counts(
    mut into: HashMap<Item, usize>,
    from: HashMap<Item, usize>,
) -> HashMap<Item, usize> {
    for (item, count) in from {
        *into.entry(item).or_insert(0) += count;
    }
    into
}

/// Absolute threshold for a relative `min_support` over `num_transactions`.
pub fn min_count(min_support: f64, num_transactions: usize) -> Result<f64, FpError> {
    if !(0.0..=1.0).contains(&min_support) {
        return Err(FpError::InvalidSupport(min_support));
    }
    Ok(min_support * num_transactions as f64)
}

/// Counts supports, then filters and orders every transaction. Transactions
/// left without any frequent item are dropped.
pub fn first_scan(transactions: &[Vec<Item>], epsilon: f64) -> (SupportTable, Vec<Vec<Item>>) {
    let counts = count_supports(transactions);
    let table = SupportTable::from_counts(&counts, epsilon);

    let ordered: Vec<Vec<Item>> = transactions
        .iter()
        .map(|transaction| table.order_transaction(transaction))
        .filter(|transaction| !transaction.is_empty())
        .collect();

    debug!(
        transactions = transactions.len(),
        distinct_items = counts.len(),
        frequent_items = table.len(),
        kept = ordered.len(),
        "first scan complete"
    );
    (table, ordered)
}

pub fn build_fp_tree(transactions: &[Vec<Item>], epsilon: f64) -> (FPTree, SupportTable) {
    let (table, ordered) = first_scan(transactions, epsilon);
    let mut fp_tree = FPTree::new();

    for transaction in &ordered {
        fp_tree.add_transaction(transaction);
    }

    debug!(nodes = fp_tree.len(), items = fp_tree.num_items(), "initial tree built");
    (fp_tree, table)
}

/// Converts a binary transaction matrix (one row per transaction, one
/// column per item) into item lists.
pub fn matrix_to_transactions(transactions: ArrayView2<i32>) -> Vec<Vec<Item>> {
    transactions
        .outer_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|&(_, &value)| value != 0)
                .map(|(item, _)| item)
                .collect()
        })
        .collect()
}
