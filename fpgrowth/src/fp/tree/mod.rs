// Tree module - FP-Tree data structures and operations

mod tree;
mod tree_ops;

// Re-export the main types
pub use tree::{FPNode, FPTree, NodeId, Route};
pub use tree_ops::{NodeIds, Nodes};
