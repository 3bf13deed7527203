//! Iterators for `OrdMultiMap`, all in global chain order

use crate::{Link, OrdMultiMap, Ptr};

/// An iterator over the valid `P`s of an `OrdMultiMap`
pub struct Ptrs<'a, P: Ptr, K, V> {
    map: &'a OrdMultiMap<P, K, V>,
    next: Option<P>,
    remaining: usize,
}

impl<'a, P: Ptr, K, V> Iterator for Ptrs<'a, P, K, V> {
    type Item = P;

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.next?;
        self.next = Link::next(self.map.a.get_inx_unwrap(p.inx()));
        self.remaining = self.remaining.wrapping_sub(1);
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, P: Ptr, K, V> ExactSizeIterator for Ptrs<'a, P, K, V> {}

/// An iterator over `(P, &K, &V)` in an `OrdMultiMap`
pub struct Iter<'a, P: Ptr, K, V> {
    ptrs: Ptrs<'a, P, K, V>,
}

impl<'a, P: Ptr, K, V> Iterator for Iter<'a, P, K, V> {
    type Item = (P, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.ptrs.next()?;
        let map = self.ptrs.map;
        let node = &map.a.get_inx_unwrap(p.inx()).t;
        Some((p, &node.k, &node.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ptrs.size_hint()
    }
}

/// An iterator over `&K` in an `OrdMultiMap`, duplicates included
pub struct Keys<'a, P: Ptr, K, V> {
    iter: Iter<'a, P, K, V>,
}

impl<'a, P: Ptr, K, V> Iterator for Keys<'a, P, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// An iterator over `&V` in an `OrdMultiMap`
pub struct Vals<'a, P: Ptr, K, V> {
    iter: Iter<'a, P, K, V>,
}

impl<'a, P: Ptr, K, V> Iterator for Vals<'a, P, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, _, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, P: Ptr, K, V> IntoIterator for &'a OrdMultiMap<P, K, V> {
    type IntoIter = Iter<'a, P, K, V>;
    type Item = (P, &'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<P: Ptr, K, V> OrdMultiMap<P, K, V> {
    /// Iteration over all valid `P`s in order
    pub fn ptrs(&self) -> Ptrs<P, K, V> {
        Ptrs {
            map: self,
            next: self.min(),
            remaining: self.len(),
        }
    }

    /// Iteration over `(P, &K, &V)` tuples in order
    pub fn iter(&self) -> Iter<P, K, V> {
        Iter { ptrs: self.ptrs() }
    }

    /// Iteration over `&K` in order
    pub fn keys(&self) -> Keys<P, K, V> {
        Keys { iter: self.iter() }
    }

    /// Iteration over `&V` in order
    pub fn vals(&self) -> Vals<P, K, V> {
        Vals { iter: self.iter() }
    }
}
