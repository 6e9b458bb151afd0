use super::*;
use std::collections::HashMap;
use std::io::Cursor;

use ndarray::Array2;

fn scenario() -> Vec<Vec<Item>> {
    vec![vec![1, 2, 3], vec![1, 2], vec![1, 3], vec![2, 3], vec![1, 2, 3, 4]]
}

fn scenario_tree() -> FPTree {
    let mut tree = FPTree::new();
    for transaction in scenario() {
        tree.add_transaction(&transaction);
    }
    tree
}

fn path_items(path: &[&FPNode]) -> Vec<Item> {
    path.iter().filter_map(|node| node.item).collect()
}

fn supports_by_item(tree: &FPTree) -> HashMap<Item, usize> {
    tree.items()
        .map(|(item, nodes)| (item, nodes.map(FPNode::count).sum()))
        .collect()
}

#[test]
fn test_itemset_storage() {
    let mut storage = utils::ItemsetStorage::new();

    storage.add_itemset_with_support(vec![7, 2, 5], 4);
    storage.add_itemset_with_support(vec![1, 3], 2);
    storage.add_itemset_with_support(vec![2, 3, 5, 9], 1);

    assert_eq!(storage.get_itemset(0), &[2, 5, 7]); // sorted!
    assert_eq!(storage.get_itemset(1), &[1, 3]);
    assert_eq!(storage.get_itemset(2), &[2, 3, 5, 9]);
    assert_eq!(storage.supports, vec![4, 2, 1]);
    assert_eq!(storage.len(), 3);
}

#[test]
fn test_group_by_level() {
    let levels = group_by_level(vec![
        FrequentItemset::new(vec![3], 4),
        FrequentItemset::new(vec![3, 1], 3),
        FrequentItemset::new(vec![2, 3, 1], 2),
        FrequentItemset::new(vec![1], 4),
    ]);

    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0].itemset_size, 1);
    assert_eq!(levels[0].len(), 2);
    assert_eq!(levels[1].get_itemset(0), &[1, 3]);
    assert_eq!(levels[1].get_support(0), 3);

    let triples: Vec<_> = levels[2].iter_with_support().collect();
    assert_eq!(triples, vec![(&[1, 2, 3][..], 2)]);
}

#[test]
fn test_root_node() {
    let tree = FPTree::new();
    assert!(tree.root().is_root());
    assert!(tree.is_empty());
    assert!(!FPNode::new_item(1, 1).is_root());
}

#[test]
#[should_panic(expected = "root")]
fn test_increment_support_on_root_panics() {
    let mut tree = FPTree::new();
    let root = tree.root_index;
    tree.node_mut(root).increment_support();
}

#[test]
fn test_add_child_reuses_existing_subtree() {
    let mut tree = FPTree::new();
    let root = tree.root_index;

    let (first, inserted) = tree.add_child(root, FPNode::new_item(1, 5));
    assert!(inserted);
    let (second, inserted) = tree.add_child(root, FPNode::new_item(1, 9));
    assert!(!inserted);

    assert_eq!(first, second);
    assert_eq!(tree.node(first).support, Some(5));
    assert_eq!(tree.node(first).parent, Some(root));
    assert_eq!(tree.root().children.len(), 1);
    assert_eq!(tree.search(root, 1).and_then(|node| node.support), Some(5));
    assert!(tree.search(root, 2).is_none());
}

#[test]
fn test_fp_tree_insert() {
    let mut tree = FPTree::new();

    tree.add_transaction(&[1, 2, 3]);

    assert!(tree.root().children.contains_key(&1));
    assert_eq!(tree.nodes(1).count(), 1);
    assert_eq!(tree.nodes(2).count(), 1);
    assert_eq!(tree.nodes(3).count(), 1);

    // Shares the [1, 2] prefix with the first transaction
    tree.add_transaction(&[1, 2, 4]);

    let node1_idx = tree.root().children[&1];
    assert_eq!(tree.node(node1_idx).support, Some(2));
    assert_eq!(tree.nodes(2).count(), 1);
    assert_eq!(tree.nodes(4).count(), 1);
    assert_eq!(tree.len(), 5);
}

#[test]
fn test_item_links_follow_insertion_order() {
    let tree = scenario_tree();

    assert_eq!(tree.item_order, vec![1, 2, 3, 4]);

    let threes: Vec<NodeId> = tree.node_ids(3).collect();
    assert_eq!(threes.len(), 3);
    let supports: Vec<usize> = threes.iter().map(|&idx| tree.node(idx).count()).collect();
    assert_eq!(supports, vec![2, 1, 1]);

    let route = tree.item_index[&3];
    assert_eq!(route.head, threes[0]);
    assert_eq!(route.tail, threes[2]);
    assert_eq!(tree.node(route.tail).link, None);

    // Restartable
    assert_eq!(tree.nodes(3).count(), 3);
    assert_eq!(tree.nodes(42).count(), 0);
}

#[test]
fn test_support_is_conserved_per_item() {
    let tree = scenario_tree();
    let supports = supports_by_item(&tree);

    assert_eq!(supports[&1], 4);
    assert_eq!(supports[&2], 4);
    assert_eq!(supports[&3], 4);
    assert_eq!(supports[&4], 1);
    assert_eq!(tree.support(2), 4);
}

#[test]
fn test_reinsertion_doubles_supports() {
    let mut once = FPTree::new();
    once.add_transaction(&[4, 2, 7]);

    let mut twice = FPTree::new();
    twice.add_transaction(&[4, 2, 7]);
    twice.add_transaction(&[4, 2, 7]);

    assert_eq!(once.len(), twice.len());
    for (a, b) in once.nodes.iter().zip(twice.nodes.iter()) {
        assert_eq!(a.item, b.item);
        assert_eq!(a.children.len(), b.children.len());
        assert!(a.children.len() <= 1);
        assert_eq!(a.support.map(|s| s * 2), b.support);
    }
}

#[test]
#[should_panic(expected = "cycle")]
fn test_link_cycle_panics() {
    let mut tree = FPTree::new();
    tree.add_transaction(&[1]);
    tree.add_transaction(&[2, 1]);

    let tail = tree.item_index[&1].tail;
    let head = tree.item_index[&1].head;
    tree.node_mut(tail).link = Some(head);

    tree.support(1);
}

#[test]
fn test_fp_tree_prefix_paths() {
    let tree = scenario_tree();

    let paths = tree.prefix_paths(3);
    let items: Vec<Vec<Item>> = paths.iter().map(|path| path_items(path)).collect();
    assert_eq!(items, vec![vec![1, 2, 3], vec![1, 3], vec![2, 3]]);

    // The last node of every path is the occurrence itself
    let counts: Vec<usize> = paths.iter().map(|path| path[path.len() - 1].count()).collect();
    assert_eq!(counts, vec![2, 1, 1]);

    assert_eq!(tree.prefix_paths(1).len(), 1);
    assert!(tree.prefix_paths(9).is_empty());
}

#[test]
fn test_project_reaccumulates_ancestor_support() {
    let tree = scenario_tree();
    let conditional = project(&tree.prefix_paths(3)).unwrap();

    let supports = supports_by_item(&conditional);
    assert_eq!(supports[&1], 3); // {1, 3} co-occur in three transactions
    assert_eq!(supports[&2], 3);
    assert_eq!(supports[&3], 4); // seed keeps its own support
    assert!(!supports.contains_key(&4));

    // Ancestor shared by the [1, 2, 3] and [1, 3] paths
    let node1_idx = conditional.root().children[&1];
    assert_eq!(conditional.node(node1_idx).support, Some(3));
}

#[test]
fn test_project_seed_with_single_path() {
    let tree = scenario_tree();
    let conditional = project(&tree.prefix_paths(4)).unwrap();

    let supports = supports_by_item(&conditional);
    assert_eq!(supports.len(), 4);
    assert!(supports.values().all(|&support| support == 1));
}

#[test]
fn test_project_rejects_empty_input() {
    assert!(matches!(project(&[]), Err(FpError::EmptyProjection)));
    assert!(matches!(project(&[Vec::new()]), Err(FpError::EmptyProjection)));
}

#[test]
fn test_project_rejects_paths_with_different_seeds() {
    let mut tree = FPTree::new();
    tree.add_transaction(&[1, 2, 3]);
    tree.add_transaction(&[2]);

    let mut paths = tree.prefix_paths(3);
    let lone_two = tree
        .prefix_paths(2)
        .into_iter()
        .find(|path| path.len() == 1)
        .unwrap();
    paths.push(lone_two);

    assert!(matches!(project(&paths), Err(FpError::MixedSeed { seed: 3, found: 2 })));
}

#[test]
fn test_fp_search_scenario() {
    let config = SearchConfig::new(3.0).unwrap();
    let mut found = fp_search(scenario_tree(), config)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    sort_itemsets(&mut found);

    let expected = vec![
        FrequentItemset::new(vec![1], 4),
        FrequentItemset::new(vec![2], 4),
        FrequentItemset::new(vec![3], 4),
        FrequentItemset::new(vec![1, 2], 3),
        FrequentItemset::new(vec![1, 3], 3),
        FrequentItemset::new(vec![2, 3], 3),
    ];
    assert_eq!(found, expected);
}

#[test]
fn test_fp_search_puts_new_item_first() {
    let config = SearchConfig::new(3.0).unwrap();
    let found: Vec<FrequentItemset> = fp_search(scenario_tree(), config).map(Result::unwrap).collect();

    assert_eq!(found[0], FrequentItemset::new(vec![1], 4));
    assert!(found.contains(&FrequentItemset::new(vec![1, 3], 3)));
    assert!(found.contains(&FrequentItemset::new(vec![2, 3], 3)));
    assert!(found.contains(&FrequentItemset::new(vec![1, 2], 3)));
}

#[test]
fn test_fp_search_empty_tree() {
    let config = SearchConfig::new(1.0).unwrap();
    assert_eq!(fp_search(FPTree::new(), config).count(), 0);
    assert!(mine(&[], 1.0).unwrap().is_empty());
}

#[test]
fn test_epsilon_zero_finds_every_cooccurring_itemset() {
    let transactions = vec![vec![1, 2], vec![2, 3], vec![1, 2, 3]];
    let mut found = mine(&transactions, 0.0).unwrap();
    sort_itemsets(&mut found);

    let expected = vec![
        FrequentItemset::new(vec![1], 2),
        FrequentItemset::new(vec![2], 3),
        FrequentItemset::new(vec![3], 2),
        FrequentItemset::new(vec![1, 2], 2),
        FrequentItemset::new(vec![1, 3], 1),
        FrequentItemset::new(vec![2, 3], 2),
        FrequentItemset::new(vec![1, 2, 3], 1),
    ];
    assert_eq!(found, expected);
}

#[test]
fn test_search_defers_projection() {
    let config = SearchConfig::new(3.0).unwrap();
    let mut search = fp_search(scenario_tree(), config);

    let first = search.next().unwrap().unwrap();
    assert_eq!(first.items, vec![1]);
    assert_eq!(search.depth(), 1);
    assert_eq!(search.emitted(), 1);
}

#[test]
fn test_depth_limit_is_reported() {
    let config = SearchConfig::new(3.0).unwrap().with_max_depth(0);
    let results: Vec<_> = fp_search(scenario_tree(), config).collect();

    // {1} has no extension, so only the descent below {2} trips the limit.
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().items, vec![1]);
    assert_eq!(results[1].as_ref().unwrap().items, vec![2]);
    assert!(matches!(results[2], Err(FpError::DepthExceeded { limit: 0 })));
}

#[test]
fn test_depth_limit_ignores_trees_without_extensions() {
    let transactions = vec![vec![1], vec![2]];
    let config = SearchConfig::new(1.0).unwrap().with_max_depth(0);
    let mut found = mine_with_config(&transactions, config).unwrap();
    sort_itemsets(&mut found);

    assert_eq!(found, vec![FrequentItemset::new(vec![1], 1), FrequentItemset::new(vec![2], 1)]);
}

#[test]
fn test_depth_limit_large_enough() {
    let config = SearchConfig::new(3.0).unwrap().with_max_depth(2);
    let results = mine_with_config(&scenario(), config).unwrap();
    assert_eq!(results.len(), 6);
}

#[test]
fn test_search_config_rejects_bad_threshold() {
    assert!(matches!(SearchConfig::new(-1.0), Err(FpError::InvalidThreshold(_))));
    assert!(matches!(SearchConfig::new(f64::NAN), Err(FpError::InvalidThreshold(_))));
    assert!(SearchConfig::new(0.0).is_ok());
}

#[test]
fn test_first_scan_orders_by_support_then_item() {
    let transactions = vec![vec![3, 1], vec![3, 2], vec![3, 1, 2], vec![5]];
    let (table, ordered) = first_scan(&transactions, 2.0);

    assert_eq!(table.frequent_items, vec![3, 1, 2]);
    assert_eq!(table.support(3), Some(3));
    assert_eq!(table.support(5), None);
    assert_eq!(ordered, vec![vec![3, 1], vec![3, 2], vec![3, 1, 2]]);
    assert_eq!(table.order_transaction(&[2, 1, 3, 3, 5]), vec![3, 1, 2]);
}

#[test]
fn test_count_supports_ignores_repeats() {
    let counts = builder::count_supports(&[vec![1, 1, 2], vec![2]]);
    assert_eq!(counts[&1], 1);
    assert_eq!(counts[&2], 2);
}

#[test]
fn test_min_count() {
    assert_eq!(min_count(0.6, 5).unwrap(), 3.0);
    assert!(matches!(min_count(1.5, 5), Err(FpError::InvalidSupport(_))));
    assert!(matches!(min_count(-0.1, 5), Err(FpError::InvalidSupport(_))));
}

#[test]
fn test_fp_growth_matrix() {
    // Transactions: [[0,1], [0,1,2], [0,2], [1,2]]
    let transactions = Array2::from_shape_vec(
        (4, 3),
        vec![
            1, 1, 0, // Transaction 0: items 0, 1
            1, 1, 1, // Transaction 1: items 0, 1, 2
            1, 0, 1, // Transaction 2: items 0, 2
            0, 1, 1, // Transaction 3: items 1, 2
        ],
    )
    .unwrap();

    let result = fp_growth_algorithm(transactions.view(), 0.5).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].len(), 3);
    assert!(result[0].iter_with_support().all(|(_, support)| support == 3));
    assert_eq!(result[1].len(), 3);
    assert!(result[1].iter_with_support().all(|(_, support)| support == 2));
}

#[test]
fn test_streaming_phases() {
    let mut state = StreamingState::new();
    let batches = scenario();
    let (first, second) = batches.split_at(2);

    count_pass(&mut state, first).unwrap();
    count_pass(&mut state, second).unwrap();
    assert!(matches!(build_pass(&mut state, first), Err(FpError::Phase { .. })));
    assert!(matches!(mine_patterns(&state, None), Err(FpError::Phase { .. })));

    finalize_counts(&mut state, 0.6).unwrap();
    assert_eq!(state.phase, ProcessingPhase::Building);
    assert_eq!(state.epsilon, Some(3.0));
    assert_eq!(state.support_table.rank(1), Some(0));
    assert!(!state.support_table.is_frequent(4));
    assert!(matches!(count_pass(&mut state, first), Err(FpError::Phase { .. })));

    build_pass(&mut state, first).unwrap();
    build_pass(&mut state, second).unwrap();
    finalize_building(&mut state).unwrap();
    assert!(matches!(build_pass(&mut state, first), Err(FpError::Phase { .. })));

    let levels = mine_patterns(&state, None).unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].len(), 3);
    assert_eq!(levels[1].len(), 3);
}

#[test]
fn test_parse_database() {
    let input = "5\n1\t3\t1 2 3\n2\t2\t1 2\n3\t2\t1 3\n\n4\t2\t2 3\n5\t4\t1 2 3 4\n";
    let database = io::parse_database(Cursor::new(input)).unwrap();

    assert_eq!(database.declared_count, 5);
    assert_eq!(database.transactions, scenario());
}

#[test]
fn test_parse_database_errors() {
    let missing = io::parse_database(Cursor::new(""));
    assert!(matches!(missing, Err(FpError::Parse { line: 1, .. })));

    let bad_item = io::parse_database(Cursor::new("1\n1\t2\t1 x\n"));
    assert!(matches!(bad_item, Err(FpError::Parse { line: 2, .. })));

    let bad_fields = io::parse_database(Cursor::new("1\n1 2 3\n"));
    assert!(matches!(bad_fields, Err(FpError::Parse { line: 2, .. })));
}

#[test]
fn test_parse_database_huge_header() {
    let database = io::parse_database(Cursor::new("18446744073709551615\n1\t1\t1\n")).unwrap();

    assert_eq!(database.declared_count, usize::MAX);
    assert_eq!(database.transactions, vec![vec![1]]);
}

#[test]
fn test_write_patterns() {
    let patterns = vec![FrequentItemset::new(vec![2, 1], 3), FrequentItemset::new(vec![1], 4)];
    let mut out = Vec::new();
    io::write_patterns(&mut out, &patterns).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "|FPs| = 2\n1, 2 : 3\n1 : 4\n");
}
