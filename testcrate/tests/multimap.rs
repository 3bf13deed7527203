use ord_multimap::{Link, OrdMultiMap};
use testcrate::{check, pairs, P0};

fn keys(map: &OrdMultiMap<P0, u64, u64>) -> Vec<u64> {
    map.keys().copied().collect()
}

/// Inserts `1..=7` in order, which results in a perfect tree with 4 at the
/// root. Values are ten times the keys.
fn perfect() -> OrdMultiMap<P0, u64, u64> {
    let mut map = OrdMultiMap::new();
    for k in 1..=7 {
        map.insert(k, k * 10);
        check(&map);
    }
    let root = map.root().unwrap();
    assert_eq!(map.get_key(root), Some(&4));
    assert_eq!(map.height(root), Some(3));
    map
}

#[test]
fn abbc() {
    let mut map: OrdMultiMap<P0, &str, u64> = OrdMultiMap::new();
    let p_a = map.insert("A", 0);
    let p_b0 = map.insert("B", 1);
    let p_b1 = map.insert("B", 2);
    let p_c = map.insert("C", 3);
    check(&map);
    assert_eq!(pairs(&map), [("A", 0), ("B", 1), ("B", 2), ("C", 3)]);
    // the insertion of "C" rotated "B" up
    assert_eq!(map.root(), Some(p_b0));
    assert!(map.is_representative(p_b0));
    assert!(!map.is_representative(p_b1));
    assert_eq!(map.height(p_b1), Some(0));
    assert_eq!(map.chain_end(p_b0), Some(p_b1));
    assert_eq!(map.chain_end(p_a), Some(p_a));
    assert_eq!(map.representative(p_b1), Some(p_b0));
    assert_eq!(map.depth(p_b1), Some(1));
    assert_eq!(map.depth(p_c), Some(2));

    // chain neighbors cross the run
    let link = map.get_link(p_b1).unwrap();
    assert_eq!(Link::prev(link), Some(p_b0));
    assert_eq!(Link::next(link), Some(p_c));

    assert_eq!(map.delete("B"), Some(("B", 2)));
    check(&map);
    assert!(!map.contains(p_b1));
    assert_eq!(map.chain_end(p_b0), Some(p_b0));
    assert_eq!(map.delete("B"), Some(("B", 1)));
    check(&map);
    assert_eq!(pairs(&map), [("A", 0), ("C", 3)]);
    assert_eq!(map.delete("D"), None);
    assert_eq!(map.len(), 2);
}

#[test]
fn delete_leaf_and_one_child() {
    let mut map = perfect();
    // leaf
    assert_eq!(map.delete(&7), Some((7, 70)));
    check(&map);
    // 6 only has 5 left
    assert_eq!(map.delete(&6), Some((6, 60)));
    check(&map);
    assert_eq!(keys(&map), [1, 2, 3, 4, 5]);
    // the tree is now left heavy but still balanced
    let root = map.root().unwrap();
    assert_eq!(map.get_key(root), Some(&4));
    assert_eq!(map.height(root), Some(3));
    // removing 5 forces a rotation at the root
    assert_eq!(map.delete(&5), Some((5, 50)));
    check(&map);
    let root = map.root().unwrap();
    assert_eq!(map.get_key(root), Some(&2));
    assert_eq!(keys(&map), [1, 2, 3, 4]);
}

#[test]
fn delete_two_children() {
    // the successor is the direct right child
    let mut map = perfect();
    map.delete(&5).unwrap();
    assert_eq!(map.delete(&4), Some((4, 40)));
    check(&map);
    assert_eq!(map.get_key(map.root().unwrap()), Some(&6));
    assert_eq!(keys(&map), [1, 2, 3, 6, 7]);

    // the successor is deeper, and brings its run along
    let mut map = perfect();
    let p5 = map.find_key(&5).unwrap();
    let p5_dup = map.insert(5, 51);
    assert_eq!(map.delete(&4), Some((4, 40)));
    check(&map);
    assert_eq!(map.root(), Some(p5));
    assert_eq!(map.chain_end(p5), Some(p5_dup));
    assert_eq!(
        pairs(&map),
        [(1, 10), (2, 20), (3, 30), (5, 50), (5, 51), (6, 60), (7, 70)]
    );
    assert_eq!(map.depth(p5_dup), Some(1));
}

#[test]
fn delete_takes_duplicates_first() {
    let mut map = perfect();
    let p4 = map.root().unwrap();
    map.insert(4, 41);
    map.insert(4, 42);
    assert_eq!(map.dup_count(p4), Some(3));
    assert_eq!(map.delete(&4), Some((4, 42)));
    assert_eq!(map.delete(&4), Some((4, 41)));
    check(&map);
    // the tree is untouched so far
    assert_eq!(map.root(), Some(p4));
    assert_eq!(map.delete(&4), Some((4, 40)));
    check(&map);
    assert!(!map.contains_key(&4));
    assert_eq!(keys(&map), [1, 2, 3, 5, 6, 7]);

    // single node
    let mut map: OrdMultiMap<P0, u64, u64> = OrdMultiMap::new();
    map.insert(0, 0);
    map.insert(0, 1);
    assert_eq!(map.delete(&1), None);
    assert_eq!(map.delete(&0), Some((0, 1)));
    assert_eq!(map.delete(&0), Some((0, 0)));
    assert!(map.is_empty());
    assert!(map.root().is_none());
    assert_eq!(map.delete(&0), None);
}

#[test]
fn rotations_keep_the_chain() {
    let mut map: OrdMultiMap<P0, u64, u64> = OrdMultiMap::new();
    let mut expected = vec![];
    // descending keys with a duplicate for every other key trigger right
    // rotations, then a zig zag triggers double rotations
    for (i, k) in (0..32u64)
        .rev()
        .chain([100, 50, 75, 60, 70, 65].into_iter())
        .enumerate()
    {
        let i = i as u64;
        map.insert(k, i);
        expected.push((k, i));
        if k % 2 == 0 {
            map.insert(k, i + 1000);
            expected.push((k, i + 1000));
        }
        check(&map);
        // stable sort keeps insertion order within a key
        expected.sort_by_key(|(k, _)| *k);
        assert_eq!(pairs(&map), expected);
    }
    assert!(map.height(map.root().unwrap()).unwrap() <= 7);
}

#[test]
fn navigation() {
    let mut map = perfect();
    let p1 = map.find_key(&1).unwrap();
    let p7 = map.find_key(&7).unwrap();
    let p7_dup = map.insert(7, 71);
    assert_eq!(map.min(), Some(p1));
    assert_eq!(map.first(), Some(p1));
    assert_eq!(map.max(), Some(p7_dup));
    assert_eq!(map.last(), Some(p7_dup));

    let p4 = map.root().unwrap();
    assert_eq!(map.subtree_min(p4), Some(p1));
    assert_eq!(map.subtree_max(p4), Some(p7));
    assert_eq!(map.subtree_max(p7_dup), None);
    let p3 = map.find_key(&3).unwrap();
    let p5 = map.find_key(&5).unwrap();
    assert_eq!(map.tree_successor(p3), Some(p4));
    assert_eq!(map.tree_predecessor(p5), Some(p4));
    assert_eq!(map.tree_successor(p7), None);
    assert_eq!(map.tree_successor(p7_dup), None);

    // advancing while mutating
    let mut adv = map.first();
    while let Some(p) = map.next_ptr(&mut adv) {
        *map.get_val_mut(p).unwrap() += 1;
    }
    let vals: Vec<u64> = map.vals().copied().collect();
    assert_eq!(vals, [11, 21, 31, 41, 51, 61, 71, 72]);
    assert_eq!(map.ptrs().len(), 8);
}

#[test]
fn drain_and_reuse() {
    let mut map = perfect();
    let gen = map.gen().get();
    let p2 = map.find_key(&2).unwrap();
    let mut drain = map.drain();
    assert_eq!(drain.next(), Some((1, 10)));
    assert_eq!(drain.next(), Some((2, 20)));
    // the rest is removed on drop
    drop(drain);
    assert!(map.is_empty());
    assert!(map.root().is_none());
    assert_eq!(map.gen().get(), gen + 1);
    assert!(map.get(p2).is_none());
    check(&map);

    let capacity = map.capacity();
    for k in (0..7).rev() {
        map.insert(k, k);
    }
    check(&map);
    assert_eq!(map.capacity(), capacity);
    assert!(map.get(p2).is_none());
    assert_eq!(keys(&map), [0, 1, 2, 3, 4, 5, 6]);

    map.clear_and_shrink();
    assert_eq!(map.capacity(), 0);
    assert!(map.in_order_sequence().is_err());
}

#[test]
fn empty_out() {
    let mut map: OrdMultiMap<P0, u64, u64> = OrdMultiMap::new();
    let mut count = 0;
    for i in 0..300u64 {
        // a scattered order of keys with runs
        let k = (i * 37) % 101;
        map.insert(k, i);
        count += 1;
    }
    check(&map);
    for k in (0..101u64).map(|i| (i * 53) % 101) {
        while let Some((key, _)) = map.delete(&k) {
            assert_eq!(key, k);
            count -= 1;
            assert_eq!(map.len(), count);
        }
        check(&map);
    }
    assert_eq!(count, 0);
    assert!(map.is_empty());
    assert!(map.min().is_none());
    assert!(map.max().is_none());
}
