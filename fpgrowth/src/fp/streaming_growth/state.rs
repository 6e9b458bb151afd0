use std::collections::HashMap;

use crate::fp::Item;
use crate::fp::builder::{SupportTable, count_supports, merge_counts, min_count};
use crate::fp::error::FpError;
use crate::fp::tree::FPTree;

/// State for phased FP-Growth processing
#[derive(Debug)]
pub struct StreamingState {
    /// Item support counts during counting phase
    pub item_counts: HashMap<Item, usize>,
    /// Total number of transactions processed
    pub num_transactions: usize,
    /// Frequent items after finalization, in insertion order
    pub support_table: SupportTable,
    /// Relative minimum support threshold
    pub min_support: Option<f64>,
    /// Absolute threshold derived from `min_support`
    pub epsilon: Option<f64>,
    /// The FP-Tree being built incrementally
    pub fp_tree: Option<FPTree>,
    /// Processing phase
    pub phase: ProcessingPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingPhase {
    Counting,
    CountingFinalized,
    Building,
    ReadyToMine,
}

impl Default for StreamingState {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingState {
    pub fn new() -> Self {
        Self {
            item_counts: HashMap::new(),
            num_transactions: 0,
            support_table: SupportTable::default(),
            min_support: None,
            epsilon: None,
            fp_tree: None,
            phase: ProcessingPhase::Counting,
        }
    }

    pub(crate) fn expect_phase(
        &self,
        expected: ProcessingPhase,
        operation: &'static str,
    ) -> Result<(), FpError> {
        if self.phase != expected {
            return Err(FpError::Phase { operation, phase: self.phase });
        }
        Ok(())
    }

    /// Add item counts from a transaction batch
    pub fn add_counts(&mut self, transactions: &[Vec<Item>]) {
        self.num_transactions += transactions.len();
        let batch = count_supports(transactions);
        self.item_counts = merge_counts(std::mem::take(&mut self.item_counts), batch);
    }

    /// Finalize counting phase and determine frequent items
    pub fn finalize_counts(&mut self, min_support: f64) -> Result<(), FpError> {
        self.expect_phase(ProcessingPhase::Counting, "finalize counts")?;

        let epsilon = min_count(min_support, self.num_transactions)?;
        self.support_table = SupportTable::from_counts(&self.item_counts, epsilon);
        self.min_support = Some(min_support);
        self.epsilon = Some(epsilon);

        self.phase = ProcessingPhase::CountingFinalized;
        Ok(())
    }

    /// Initialize FP-Tree for building phase
    pub fn init_tree(&mut self) -> Result<(), FpError> {
        self.expect_phase(ProcessingPhase::CountingFinalized, "init tree")?;

        self.fp_tree = Some(FPTree::new());
        self.phase = ProcessingPhase::Building;
        Ok(())
    }

    /// Complete building phase
    pub fn finalize_building(&mut self) -> Result<(), FpError> {
        self.expect_phase(ProcessingPhase::Building, "finalize building")?;

        self.phase = ProcessingPhase::ReadyToMine;
        Ok(())
    }
}
