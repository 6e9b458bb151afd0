use crate::fp::Item;
use crate::fp::growth::FrequentItemset;

/// Flat storage for itemsets: one item buffer, with an `(start, len)`
/// offset and a support per itemset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsetStorage {
    pub items: Vec<Item>,
    pub offsets: Vec<(usize, usize)>,
    pub supports: Vec<usize>,
}

/// All itemsets of one size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequentLevel {
    pub storage: ItemsetStorage,
    pub itemset_size: usize,
}

impl ItemsetStorage {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new(), offsets: Vec::new(), supports: Vec::new() }
    }

    pub(crate) fn add_itemset_with_support(&mut self, mut items: Vec<Item>, support: usize) {
        items.sort_unstable();
        items.dedup();
        let start = self.items.len();
        self.items.extend_from_slice(&items);
        self.offsets.push((start, items.len()));
        self.supports.push(support);
    }

    pub(crate) fn get_itemset(&self, idx: usize) -> &[Item] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }
}

impl FrequentLevel {
    pub fn new(itemset_size: usize) -> Self {
        Self { storage: ItemsetStorage::new(), itemset_size }
    }

    pub fn add_itemset_with_support(&mut self, items: Vec<Item>, support: usize) -> usize {
        self.storage.add_itemset_with_support(items, support);
        self.storage.len() - 1
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn get_itemset(&self, idx: usize) -> &[Item] {
        self.storage.get_itemset(idx)
    }

    pub fn get_support(&self, idx: usize) -> usize {
        self.storage.supports[idx]
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = &[Item]> {
        (0..self.storage.len()).map(move |idx| self.get_itemset(idx))
    }

    pub fn iter_with_support(&self) -> impl Iterator<Item = (&[Item], usize)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.get_support(idx)))
    }
}

/// Groups itemsets by size; level `k - 1` holds the itemsets of size `k`.
/// Levels in between that have no itemset are present but empty.
pub fn group_by_level<I>(itemsets: I) -> Vec<FrequentLevel>
where
    I: IntoIterator<Item = FrequentItemset>,
{
    let mut levels: Vec<FrequentLevel> = Vec::new();

    for itemset in itemsets {
        let size = itemset.len();
        if size == 0 {
            continue;
        }
        while levels.len() < size {
            levels.push(FrequentLevel::new(levels.len() + 1));
        }
        levels[size - 1].add_itemset_with_support(itemset.items, itemset.support);
    }
    levels
}
