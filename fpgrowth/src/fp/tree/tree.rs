use std::collections::HashMap;

use crate::fp::Item;

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

/// One item occurrence in an [`FPTree`].
///
/// The root is the only node without an item and without a support.
#[derive(Debug, Clone)]
pub struct FPNode {
    pub item: Option<Item>,
    pub support: Option<usize>,
    pub parent: Option<NodeId>,
    pub children: HashMap<Item, NodeId>,
    /// Next node carrying the same item. Not an ownership edge.
    pub link: Option<NodeId>,
}

/// Head and tail of one item's node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub head: NodeId,
    pub tail: NodeId,
}

/// Prefix tree over ordered transactions.
///
/// Nodes live in a flat arena owned by the tree; parent, child and link
/// edges are all arena indices. `item_index` threads every node of an
/// item together in insertion order, and `item_order` remembers the order
/// in which items first appeared so that iteration is deterministic.
#[derive(Debug, Clone)]
pub struct FPTree {
    pub nodes: Vec<FPNode>,
    pub item_index: HashMap<Item, Route>,
    pub item_order: Vec<Item>,
    pub root_index: NodeId,
}

impl FPNode {
    pub fn new_root() -> Self {
        Self {
            item: None,
            support: None,
            parent: None,
            children: HashMap::new(),
            link: None,
        }
    }

    /// A detached node, attached to a tree with [`FPTree::add_child`].
    pub fn new_item(item: Item, support: usize) -> Self {
        Self {
            item: Some(item),
            support: Some(support),
            parent: None,
            children: HashMap::new(),
            link: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.item.is_none() && self.support.is_none()
    }

    pub fn search(&self, item: Item) -> Option<NodeId> {
        self.children.get(&item).copied()
    }

    /// Support of a non-root node.
    ///
    /// # Panics
    ///
    /// Panics on the root.
    pub fn count(&self) -> usize {
        match self.support {
            Some(support) => support,
            None => panic!("the root node carries no support"),
        }
    }

    /// # Panics
    ///
    /// Panics on the root.
    pub fn increment_support(&mut self) {
        self.add_support(1);
    }

    /// # Panics
    ///
    /// Panics on the root.
    pub fn add_support(&mut self, amount: usize) {
        match self.support.as_mut() {
            Some(support) => *support += amount,
            None => panic!("cannot add support to the root node"),
        }
    }
}

impl Default for FPTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FPTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![FPNode::new_root()],
            item_index: HashMap::new(),
            item_order: Vec::new(),
            root_index: 0,
        }
    }

    pub fn root(&self) -> &FPNode {
        &self.nodes[self.root_index]
    }

    pub fn node(&self, id: NodeId) -> &FPNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut FPNode {
        &mut self.nodes[id]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no transaction item has been inserted.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of distinct items in the tree.
    pub fn num_items(&self) -> usize {
        self.item_order.len()
    }

    /// Child of `parent` carrying `item`, if any.
    pub fn search(&self, parent: NodeId, item: Item) -> Option<&FPNode> {
        self.nodes[parent].search(item).map(|idx| &self.nodes[idx])
    }

    /// Attaches `child` under `parent` unless a child with the same item
    /// already exists, in which case the existing subtree is kept and
    /// `child` is discarded. Returns the id of the child now holding the
    /// item and whether it was newly inserted.
    ///
    /// New nodes are not registered in the item index; see
    /// [`FPTree::register_link`].
    pub fn add_child(&mut self, parent: NodeId, mut child: FPNode) -> (NodeId, bool) {
        let item = match child.item {
            Some(item) => item,
            None => panic!("a root node cannot be added as a child"),
        };
        if let Some(existing) = self.nodes[parent].search(item) {
            return (existing, false);
        }

        let new_index = self.nodes.len();
        child.parent = Some(parent);
        self.nodes.push(child);
        self.nodes[parent].children.insert(item, new_index);
        (new_index, true)
    }
}
