use tracing::{debug, trace};

use super::projection::project;
use crate::fp::Item;
use crate::fp::error::FpError;
use crate::fp::tree::FPTree;

/// Parameters of one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Absolute minimum support; an itemset is frequent when its support
    /// is at least this value.
    pub epsilon: f64,
    /// Maximum number of nested conditional trees. `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl SearchConfig {
    pub fn new(epsilon: f64) -> Result<Self, FpError> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(FpError::InvalidThreshold(epsilon));
        }
        Ok(Self { epsilon, max_depth: None })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn is_frequent(&self, support: usize) -> bool {
        support as f64 >= self.epsilon
    }
}

/// An itemset together with its absolute support.
///
/// Items are kept in discovery order: the most recently fixed item first,
/// followed by the suffix it extended.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequentItemset {
    pub items: Vec<Item>,
    pub support: usize,
}

impl FrequentItemset {
    pub fn new(items: Vec<Item>, support: usize) -> Self {
        Self { items, support }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    /// The same itemset with its items in ascending order.
    pub fn sorted(mut self) -> Self {
        self.items.sort_unstable();
        self
    }
}

/// Canonical order for comparing result sets: each itemset's items
/// ascending, then itemsets by size, by items, and by support.
pub fn sort_itemsets(itemsets: &mut [FrequentItemset]) {
    for itemset in itemsets.iter_mut() {
        itemset.items.sort_unstable();
    }
    itemsets.sort_by(|a, b| {
        a.len()
            .cmp(&b.len())
            .then_with(|| a.items.cmp(&b.items))
            .then_with(|| a.support.cmp(&b.support))
    });
}

struct Frame {
    tree: FPTree,
    suffix: Vec<Item>,
    cursor: usize,
}

/// Depth-first FP-Growth search over a tree and its conditional trees.
///
/// Each frame owns one tree (the initial tree at the bottom, conditional
/// trees above it) and a cursor into its item order. The conditional tree
/// for an emitted itemset is only built when the next result is requested,
/// so a consumer that stops early never pays for it.
///
/// After an error the search is over and yields `None`.
pub struct FpSearch {
    stack: Vec<Frame>,
    pending: Option<Vec<Item>>,
    config: SearchConfig,
    emitted: usize,
}

/// Starts a search over `tree`.
pub fn fp_search(tree: FPTree, config: SearchConfig) -> FpSearch {
    debug!(
        nodes = tree.len(),
        items = tree.num_items(),
        epsilon = config.epsilon,
        "starting frequent pattern search"
    );
    FpSearch {
        stack: vec![Frame { tree, suffix: Vec::new(), cursor: 0 }],
        pending: None,
        config,
        emitted: 0,
    }
}

impl FpSearch {
    /// Number of itemsets yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Current number of frames, the initial tree included.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Pushes the conditional tree for `suffix`, unless it cannot extend
    /// the suffix any further. The depth limit only applies to trees that
    /// would yield something.
    fn descend(&mut self, suffix: Vec<Item>) -> Result<(), FpError> {
        let Some(frame) = self.stack.last() else {
            return Ok(());
        };

        let projected = project(&frame.tree.prefix_paths(suffix[0]))?;
        let extends = projected
            .item_order
            .iter()
            .any(|&item| !suffix.contains(&item) && self.config.is_frequent(projected.support(item)));
        if !extends {
            return Ok(());
        }
        if let Some(limit) = self.config.max_depth.filter(|&limit| suffix.len() > limit) {
            return Err(FpError::DepthExceeded { limit });
        }

        trace!(depth = self.stack.len(), suffix = ?suffix, "descending into conditional tree");
        self.stack.push(Frame { tree: projected, suffix, cursor: 0 });
        Ok(())
    }

    fn abort(&mut self, err: FpError) -> Option<Result<FrequentItemset, FpError>> {
        debug!(error = %err, emitted = self.emitted, "frequent pattern search aborted");
        self.stack.clear();
        Some(Err(err))
    }
}

impl Iterator for FpSearch {
    type Item = Result<FrequentItemset, FpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(suffix) = self.pending.take() {
            if let Err(err) = self.descend(suffix) {
                return self.abort(err);
            }
        }

        loop {
            let frame = self.stack.last_mut()?;
            let next_item = frame.tree.item_order.get(frame.cursor).copied();
            let Some(item) = next_item else {
                self.stack.pop();
                if self.stack.is_empty() {
                    debug!(emitted = self.emitted, "frequent pattern search finished");
                }
                continue;
            };
            frame.cursor += 1;

            if frame.suffix.contains(&item) {
                continue;
            }
            let support = frame.tree.support(item);
            if !self.config.is_frequent(support) {
                continue;
            }

            let mut items = Vec::with_capacity(frame.suffix.len() + 1);
            items.push(item);
            items.extend_from_slice(&frame.suffix);

            self.pending = Some(items.clone());
            self.emitted += 1;
            return Some(Ok(FrequentItemset { items, support }));
        }
    }
}
