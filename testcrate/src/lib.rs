use ord_multimap::{ptr_struct, OrdMultiMap};

ptr_struct!(P0);

/// Collects `(key, value)` pairs in chain order
pub fn pairs<K: Clone, V: Clone>(map: &OrdMultiMap<P0, K, V>) -> Vec<(K, V)> {
    map.iter().map(|(_, k, v)| (k.clone(), v.clone())).collect()
}

/// Panics with the debug output of `map` if any invariant is broken
pub fn check<K: Ord + core::fmt::Debug, V: core::fmt::Debug>(map: &OrdMultiMap<P0, K, V>) {
    if let Err(e) = OrdMultiMap::_check_invariants(map) {
        panic!("{e}\n{}", map.debug());
    }
}
