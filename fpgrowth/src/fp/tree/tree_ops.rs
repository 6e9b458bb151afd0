use super::tree::{FPNode, FPTree, NodeId, Route};
use crate::fp::Item;

/// Walks one item's link list, yielding node ids in insertion order.
#[derive(Debug, Clone)]
pub struct NodeIds<'a> {
    tree: &'a FPTree,
    next: Option<NodeId>,
    // A list can never be longer than the arena; running past it means a cycle.
    remaining: usize,
}

impl Iterator for NodeIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        if self.remaining == 0 {
            panic!("item link list starting at node {} forms a cycle", current);
        }
        self.remaining -= 1;
        self.next = self.tree.nodes[current].link;
        Some(current)
    }
}

/// Walks one item's link list, yielding nodes in insertion order.
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    ids: NodeIds<'a>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a FPNode;

    fn next(&mut self) -> Option<&'a FPNode> {
        let tree = self.ids.tree;
        self.ids.next().map(|idx| &tree.nodes[idx])
    }
}

impl FPTree {
    /// Inserts one ordered transaction, sharing any existing prefix.
    pub fn add_transaction(&mut self, transaction: &[Item]) {
        let mut current_index = self.root_index;

        for &item in transaction {
            if let Some(child_index) = self.nodes[current_index].search(item) {
                self.nodes[child_index].increment_support();
                current_index = child_index;
            } else {
                let (new_index, _) = self.add_child(current_index, FPNode::new_item(item, 1));
                self.register_link(new_index);
                current_index = new_index;
            }
        }
    }

    /// Appends `node` to the tail of its item's link list.
    pub fn register_link(&mut self, node: NodeId) {
        let item = match self.nodes[node].item {
            Some(item) => item,
            None => panic!("the root node cannot be linked"),
        };

        match self.item_index.get_mut(&item) {
            Some(route) => {
                self.nodes[route.tail].link = Some(node);
                route.tail = node;
            }
            None => {
                self.item_index.insert(item, Route { head: node, tail: node });
                self.item_order.push(item);
            }
        }
    }

    /// Every item in first-appearance order, paired with a fresh walk over
    /// its nodes.
    pub fn items(&self) -> impl Iterator<Item = (Item, Nodes<'_>)> + '_ {
        self.item_order.iter().map(move |&item| (item, self.nodes(item)))
    }

    /// Nodes carrying `item`; empty when the item is absent.
    pub fn nodes(&self, item: Item) -> Nodes<'_> {
        Nodes { ids: self.node_ids(item) }
    }

    pub fn node_ids(&self, item: Item) -> NodeIds<'_> {
        NodeIds {
            tree: self,
            next: self.item_index.get(&item).map(|route| route.head),
            remaining: self.nodes.len(),
        }
    }

    /// Total support of `item` across the tree.
    pub fn support(&self, item: Item) -> usize {
        self.nodes(item).map(FPNode::count).sum()
    }

    /// One root-to-node path per occurrence of `item`, root excluded,
    /// ordered shallow to deep.
    pub fn prefix_paths(&self, item: Item) -> Vec<Vec<&FPNode>> {
        self.node_ids(item)
            .map(|idx| self.path_to(idx).into_iter().map(|i| &self.nodes[i]).collect())
            .collect()
    }

    pub(crate) fn prefix_path_ids(&self, item: Item) -> Vec<Vec<NodeId>> {
        self.node_ids(item).map(|idx| self.path_to(idx)).collect()
    }

    fn path_to(&self, node_index: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(node_index);

        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if node.is_root() {
                break;
            }
            path.push(idx);
            current = node.parent;
        }

        path.reverse();
        path
    }
}
