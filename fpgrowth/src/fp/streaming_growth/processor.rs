use tracing::info;

use super::state::{ProcessingPhase, StreamingState};
use crate::fp::Item;
use crate::fp::error::FpError;
use crate::fp::growth::{SearchConfig, fp_search};
use crate::fp::utils::{FrequentLevel, group_by_level};

/// Process counting pass for phased FP-Growth
pub fn count_pass(state: &mut StreamingState, transactions: &[Vec<Item>]) -> Result<(), FpError> {
    state.expect_phase(ProcessingPhase::Counting, "count")?;
    state.add_counts(transactions);
    Ok(())
}

/// Finalize counting and determine frequent items
pub fn finalize_counts(state: &mut StreamingState, min_support: f64) -> Result<(), FpError> {
    state.finalize_counts(min_support)?;
    state.init_tree()?;
    info!(
        transactions = state.num_transactions,
        distinct_items = state.item_counts.len(),
        frequent_items = state.support_table.len(),
        "counting finalized"
    );
    Ok(())
}

/// Process building pass for phased FP-Growth
pub fn build_pass(state: &mut StreamingState, transactions: &[Vec<Item>]) -> Result<(), FpError> {
    state.expect_phase(ProcessingPhase::Building, "build")?;

    let phase = state.phase;
    let StreamingState { support_table, fp_tree, .. } = state;
    let Some(fp_tree) = fp_tree.as_mut() else {
        return Err(FpError::Phase { operation: "build", phase });
    };

    for transaction in transactions {
        let ordered = support_table.order_transaction(transaction);
        if !ordered.is_empty() {
            fp_tree.add_transaction(&ordered);
        }
    }

    Ok(())
}

/// Finalize building phase
pub fn finalize_building(state: &mut StreamingState) -> Result<(), FpError> {
    state.finalize_building()?;
    if let Some(fp_tree) = state.fp_tree.as_ref() {
        info!(nodes = fp_tree.len(), items = fp_tree.num_items(), "tree ready to mine");
    }
    Ok(())
}

/// Mine patterns from the built FP-Tree, grouped by itemset size
pub fn mine_patterns(
    state: &StreamingState,
    max_depth: Option<usize>,
) -> Result<Vec<FrequentLevel>, FpError> {
    state.expect_phase(ProcessingPhase::ReadyToMine, "mine")?;

    let (Some(fp_tree), Some(epsilon)) = (state.fp_tree.as_ref(), state.epsilon) else {
        return Err(FpError::Phase { operation: "mine", phase: state.phase });
    };

    let mut config = SearchConfig::new(epsilon)?;
    config.max_depth = max_depth;

    let itemsets = fp_search(fp_tree.clone(), config).collect::<Result<Vec<_>, _>>()?;
    Ok(group_by_level(itemsets))
}
