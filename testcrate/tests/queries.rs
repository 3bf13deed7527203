use ord_multimap::{OrdMultiMap, QueryError};
use testcrate::{check, P0};

fn words(text: &str) -> OrdMultiMap<P0, String, usize> {
    let mut map = OrdMultiMap::new();
    let mut offset = 0;
    for word in text.split(' ') {
        map.insert(word.to_owned(), offset);
        offset += word.len();
    }
    check(&map);
    map
}

#[test]
fn empty_map() {
    let map: OrdMultiMap<P0, String, usize> = OrdMultiMap::new();
    assert!(matches!(map.in_order_sequence(), Err(QueryError::EmptyMap)));
    assert!(matches!(
        map.max_frequency_level_sequence(),
        Err(QueryError::EmptyMap)
    ));
    assert!(matches!(
        map.range_sequence("A", "Z"),
        Err(QueryError::EmptyMap)
    ));
    assert_eq!(QueryError::EmptyMap.to_string(), "the map is empty");
}

#[test]
fn this_is_an_example() {
    let map = words("THIS IS AN EXAMPLE");
    assert_eq!(map.in_order_sequence().unwrap().as_slice(), [6, 8, 4, 0]);
    assert_eq!(map.range_sequence("AN", "THIS").unwrap().as_slice(), [8, 4]);
    // strict at both ends
    assert_eq!(map.range_sequence("AN", "IS").unwrap().as_slice(), [8]);
    assert!(map.range_sequence("EXAMPLE", "IS").unwrap().is_empty());
    assert!(map.range_sequence("Z", "A").unwrap().is_empty());
    // bounds do not need to be present
    assert_eq!(map.range_sequence("B", "J").unwrap().as_slice(), [8, 4]);
}

#[test]
fn range_keeps_insertion_order_within_keys() {
    let map = words("B A C B D B C");
    // offsets: B0 A1 C2 B3 D4 B5 C6
    assert_eq!(
        map.range_sequence("A", "D").unwrap().as_slice(),
        [0, 3, 5, 2, 6]
    );
    assert_eq!(
        map.in_order_sequence().unwrap().as_slice(),
        [1, 0, 3, 5, 2, 6, 4]
    );
}

#[test]
fn max_frequency_level() {
    // "B" is the root and the most frequent key
    let map = words("A B B C");
    assert_eq!(map.max_frequency_level_sequence().unwrap().as_slice(), [1, 2]);

    // "C" is most frequent, and shares its level with "A"
    let map = words("A B C C C");
    assert_eq!(
        map.max_frequency_level_sequence().unwrap().as_slice(),
        [0, 2, 3, 4]
    );

    // ties go to the least key, here "A" on the second level
    let map = words("B A C A C");
    assert_eq!(
        map.max_frequency_level_sequence().unwrap().as_slice(),
        [1, 3, 2, 4]
    );

    // a single run
    let map = words("X X X");
    assert_eq!(map.max_frequency_level_sequence().unwrap().as_slice(), [0, 1, 2]);
}

#[test]
fn level_contains_whole_runs() {
    let mut map: OrdMultiMap<P0, u32, u32> = OrdMultiMap::new();
    for i in 0..200u32 {
        let k = (i * 7) % 31;
        map.insert(k, i);
        // key 5 gets the most nodes
        if k == 5 || i % 11 == 0 {
            map.insert(5, 1000 + i);
        }
    }
    check(&map);
    let p5 = map.find_key(&5).unwrap();
    let level = map.depth(p5).unwrap();
    let expected: Vec<u32> = map
        .iter()
        .filter(|(p, ..)| map.depth(*p) == Some(level))
        .map(|(_, _, v)| *v)
        .collect();
    let seq = map.max_frequency_level_sequence().unwrap();
    assert_eq!(seq.as_slice(), &expected[..]);
    assert!(seq.len() >= map.dup_count(p5).unwrap());
}

#[test]
fn in_order_length() {
    let mut map: OrdMultiMap<P0, u8, usize> = OrdMultiMap::new();
    for i in 0..1000 {
        map.insert((i % 13) as u8, i);
        let seq = map.in_order_sequence().unwrap();
        assert_eq!(seq.len(), map.len());
    }
    let seq = map.in_order_sequence().unwrap();
    assert_eq!(seq.capacity(), map.len());
    let vals: Vec<usize> = map.vals().copied().collect();
    assert_eq!(seq.into_vec(), vals);
}
