use alloc::collections::TryReserveError;
use core::{borrow::Borrow, cmp::Ordering, fmt};

use crate::{sequence::INITIAL_CAPACITY, KeySequence, Link, OrdMultiMap, Ptr};

/// Error from the sequence queries on an `OrdMultiMap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The map has no nodes, so there is nothing to derive a sequence from
    EmptyMap,
    /// Growing the output sequence failed
    Alloc(TryReserveError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::EmptyMap => write!(f, "the map is empty"),
            QueryError::Alloc(e) => write!(f, "failed to grow the key sequence: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::EmptyMap => None,
            QueryError::Alloc(e) => Some(e),
        }
    }
}

impl From<TryReserveError> for QueryError {
    fn from(e: TryReserveError) -> Self {
        QueryError::Alloc(e)
    }
}

impl<P: Ptr, K, V> OrdMultiMap<P, K, V> {
    /// Returns the representative following the run of `rep` in the chain
    fn next_representative(&self, rep: P::Inx) -> Option<P::Inx> {
        Link::next(self.a.get_inx_unwrap(self.run_end(rep))).map(|p| p.inx())
    }

    /// Number of nodes in the run of `rep`
    fn run_len(&self, rep: P::Inx) -> usize {
        let end = self.run_end(rep);
        let mut count = 1;
        let mut tmp = rep;
        while tmp != end {
            count += 1;
            match Link::next(self.a.get_inx_unwrap(tmp)) {
                Some(next) => tmp = next.inx(),
                None => break,
            }
        }
        count
    }
}

/// Queries that derive a `KeySequence` of values from the map. All of them
/// return `QueryError::EmptyMap` if there are no nodes.
///
/// ```
/// use ord_multimap::{ptr_struct, OrdMultiMap};
///
/// ptr_struct!(P0);
///
/// let mut map: OrdMultiMap<P0, &str, usize> = OrdMultiMap::new();
/// for (i, word) in ["D", "B", "A", "C", "B", "E"].into_iter().enumerate() {
///     map.insert(word, i);
/// }
///
/// let all = map.in_order_sequence().unwrap();
/// assert_eq!(all.as_slice(), [2, 1, 4, 3, 0, 5]);
///
/// // strictly between the bounds, duplicates in insertion order
/// let range = map.range_sequence("A", "D").unwrap();
/// assert_eq!(range.as_slice(), [1, 4, 3]);
///
/// // "B" has the largest run and ended up as the root, which is alone on
/// // its level of the tree
/// let level = map.max_frequency_level_sequence().unwrap();
/// assert_eq!(level.as_slice(), [1, 4]);
/// ```
impl<P: Ptr, K, V: Clone> OrdMultiMap<P, K, V> {
    /// Returns every value in chain order. The length is always
    /// [OrdMultiMap::len].
    pub fn in_order_sequence(&self) -> Result<KeySequence<V>, QueryError> {
        if self.is_empty() {
            return Err(QueryError::EmptyMap)
        }
        let mut seq = KeySequence::with_capacity(self.len())?;
        for v in self.vals() {
            seq.push(v.clone())?;
        }
        Ok(seq)
    }

    /// Finds the key with the most nodes, the first one in key order on ties,
    /// and returns the runs of every key on the same tree level as it. The
    /// root is at depth 1. Runs are emitted whole and in chain order.
    pub fn max_frequency_level_sequence(&self) -> Result<KeySequence<V>, QueryError> {
        let first = match self.min() {
            Some(first) => first.inx(),
            None => return Err(QueryError::EmptyMap),
        };
        let mut best = (first, self.run_len(first));
        let mut tmp = self.next_representative(first);
        while let Some(rep) = tmp {
            let count = self.run_len(rep);
            if count > best.1 {
                best = (rep, count);
            }
            tmp = self.next_representative(rep);
        }
        let level = self.depth_inx(best.0);

        let mut seq = KeySequence::with_capacity(INITIAL_CAPACITY.min(self.len()))?;
        let mut tmp = Some(first);
        while let Some(rep) = tmp {
            if self.depth_inx(rep) == level {
                let end = self.run_end(rep);
                let mut p = rep;
                loop {
                    let link = self.a.get_inx_unwrap(p);
                    seq.push(link.v.clone())?;
                    if p == end {
                        break
                    }
                    match Link::next(link) {
                        Some(next) => p = next.inx(),
                        None => break,
                    }
                }
            }
            tmp = self.next_representative(rep);
        }
        Ok(seq)
    }
}

impl<P: Ptr, K: Ord, V: Clone> OrdMultiMap<P, K, V> {
    /// Returns the value of every node with `low < key < high` in chain
    /// order, so duplicates come in insertion order. Nothing matching is an
    /// empty sequence, not an error.
    pub fn range_sequence<Q>(&self, low: &Q, high: &Q) -> Result<KeySequence<V>, QueryError>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.is_empty() {
            return Err(QueryError::EmptyMap)
        }
        let mut seq = KeySequence::with_capacity(INITIAL_CAPACITY.min(self.len()))?;
        for (_, k, v) in self {
            let k = Borrow::<Q>::borrow(k);
            if Ord::cmp(k, high) != Ordering::Less {
                // the rest of the chain is not less either
                break
            }
            if Ord::cmp(k, low) == Ordering::Greater {
                seq.push(v.clone())?;
            }
        }
        Ok(seq)
    }
}
