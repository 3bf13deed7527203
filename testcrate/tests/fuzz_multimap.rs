use std::collections::BTreeMap;

use ord_multimap::OrdMultiMap;
use rand_xoshiro::{
    rand_core::{RngCore, SeedableRng},
    Xoshiro128StarStar,
};
use testcrate::{check, P0};

#[test]
fn fuzz_multimap() {
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);

    // make sure we have plenty of duplicates
    const MAX_KEY: u64 = 64;

    let mut counter_v = 0u64;
    let mut new_v = || {
        counter_v += 1;
        counter_v
    };

    let mut a: OrdMultiMap<P0, u64, u64> = OrdMultiMap::new();
    // values of each key in insertion order
    let mut b: BTreeMap<u64, Vec<(P0, u64)>> = BTreeMap::new();
    let mut len = 0;
    let mut gen = 2;
    let mut max_len = 0;
    let mut removed: Vec<P0> = vec![];
    for _ in 0..200_000 {
        check(&a);
        assert_eq!(a.len(), len);
        assert_eq!(a.is_empty(), len == 0);
        assert_eq!(a.gen().get(), gen);
        max_len = max_len.max(len);

        let k = rng.next_u64() % MAX_KEY;
        match rng.next_u32() % 1000 {
            0..=399 => {
                let v = new_v();
                let p = a.insert(k, v);
                let run = b.entry(k).or_default();
                assert_eq!(a.is_representative(p), run.is_empty());
                run.push((p, v));
                len += 1;
            }
            400..=749 => {
                // removes the most recent node of the key
                let res = a.delete(&k);
                match b.get_mut(&k) {
                    Some(run) => {
                        let (p, v) = run.pop().unwrap();
                        assert_eq!(res, Some((k, v)));
                        assert!(!a.contains(p));
                        removed.push(p);
                        if run.is_empty() {
                            b.remove(&k);
                            assert!(!a.contains_key(&k));
                        }
                        len -= 1;
                        gen += 1;
                    }
                    None => assert!(res.is_none()),
                }
            }
            750..=899 => {
                // lookups
                match b.get(&k) {
                    Some(run) => {
                        let rep = a.find_key(&k).unwrap();
                        assert_eq!(rep, run[0].0);
                        assert_eq!(a.chain_end(rep), Some(run[run.len() - 1].0));
                        assert_eq!(a.dup_count(rep), Some(run.len()));
                        let (p, v) = run[(rng.next_u32() as usize) % run.len()];
                        assert_eq!(a.get(p), Some((&k, &v)));
                        assert_eq!(a.representative(p), Some(rep));
                        let root_height = a.height(a.root().unwrap()).unwrap();
                        assert!(a.depth(p).unwrap() <= usize::from(root_height));
                    }
                    None => {
                        assert!(a.find_key(&k).is_none());
                        assert!(!a.contains_key(&k));
                    }
                }
                if let Some(p) = removed.pop() {
                    assert!(a.get(p).is_none());
                    assert!(a.get_val_mut(p).is_none());
                }
            }
            900..=997 => {
                // whole sequence queries against the model
                let expected: Vec<u64> = b.values().flatten().map(|(_, v)| *v).collect();
                let vals: Vec<u64> = a.vals().copied().collect();
                assert_eq!(vals, expected);
                if len == 0 {
                    assert!(a.in_order_sequence().is_err());
                    assert!(a.range_sequence(&0, &MAX_KEY).is_err());
                } else {
                    assert_eq!(a.in_order_sequence().unwrap().as_slice(), &expected[..]);
                    let high = rng.next_u64() % (MAX_KEY + 1);
                    let expected: Vec<u64> = b
                        .iter()
                        .filter(|(key, _)| k < **key && **key < high)
                        .flat_map(|(_, run)| run.iter().map(|(_, v)| *v))
                        .collect();
                    assert_eq!(a.range_sequence(&k, &high).unwrap().as_slice(), &expected[..]);
                    // at least the most frequent run is in the result
                    let level = a.max_frequency_level_sequence().unwrap();
                    assert!(!level.is_empty());
                    let max_count = b.values().map(|run| run.len()).max().unwrap();
                    assert!(level.len() >= max_count);
                }
            }
            _ => {
                // rare full clear
                if rng.next_u32() % 2 == 0 {
                    a.clear();
                } else {
                    let drained: Vec<(u64, u64)> = a.drain().collect();
                    let expected: Vec<(u64, u64)> = b
                        .iter()
                        .flat_map(|(key, run)| run.iter().map(|(_, v)| (*key, *v)))
                        .collect();
                    assert_eq!(drained, expected);
                }
                for run in b.values() {
                    for (p, _) in run {
                        assert!(!a.contains(*p));
                    }
                }
                b.clear();
                len = 0;
                gen += 1;
            }
        }
    }
    assert!(max_len > 50);
    check(&a);
    // empty out the rest
    for key in 0..MAX_KEY {
        while a.delete(&key).is_some() {}
    }
    assert!(a.is_empty());
    assert!(a.root().is_none());
    check(&a);
}
