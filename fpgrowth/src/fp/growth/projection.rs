use tracing::trace;

use crate::fp::Item;
use crate::fp::error::FpError;
use crate::fp::tree::{FPNode, FPTree};

/// Builds the conditional tree for the item that ends every path in
/// `paths`.
///
/// The seed item is taken from the last node of the first path; a path
/// ending in any other item is rejected with [`FpError::MixedSeed`]. Every
/// path is copied into a fresh tree: seed nodes keep their original
/// support, ancestors start at zero. A second pass then walks the new
/// tree's own prefix paths for the seed and adds each seed node's support
/// to all of its ancestors, so an ancestor shared by several paths ends
/// up with the sum of their seed supports.
///
/// The seed leaves stay in the projected tree; the search skips them
/// because the seed is already part of the suffix.
pub fn project(paths: &[Vec<&FPNode>]) -> Result<FPTree, FpError> {
    if paths.iter().any(|path| path.is_empty()) {
        return Err(FpError::EmptyProjection);
    }
    let seed = match paths.first().and_then(|path| path.last()) {
        Some(node) => item_of(node),
        None => return Err(FpError::EmptyProjection),
    };
    for path in paths {
        if let Some(found) = path.last().map(|node| item_of(node)).filter(|&item| item != seed) {
            return Err(FpError::MixedSeed { seed, found });
        }
    }

    let mut projected = FPTree::new();

    for path in paths {
        let mut current_index = projected.root_index;

        for node in path {
            let item = item_of(node);
            current_index = match projected.nodes[current_index].search(item) {
                Some(existing) => existing,
                None => {
                    let support = if item == seed { node.count() } else { 0 };
                    let (new_index, _) =
                        projected.add_child(current_index, FPNode::new_item(item, support));
                    projected.register_link(new_index);
                    new_index
                }
            };
        }
    }

    for path in projected.prefix_path_ids(seed) {
        let Some((&seed_index, ancestors)) = path.split_last() else {
            continue;
        };
        let support = projected.nodes[seed_index].count();
        for &ancestor in ancestors.iter().rev() {
            projected.nodes[ancestor].add_support(support);
        }
    }

    trace!(
        seed,
        paths = paths.len(),
        nodes = projected.len(),
        items = projected.num_items(),
        "projected conditional tree"
    );
    Ok(projected)
}

fn item_of(node: &FPNode) -> Item {
    match node.item {
        Some(item) => item,
        None => panic!("prefix paths never contain the root node"),
    }
}
