use core::{
    borrow::Borrow,
    fmt,
    ops::{Deref, DerefMut, Index, IndexMut},
};

use crate::{Arena, Ptr};

/// A link in a `ChainArena` with a public `t: T` field and `Option<P>`
/// interlinks to the previous and next links. `Deref` and `DerefMut` give
/// direct access to the methods on `T`. The interlinks are private and only
/// readable through the associated functions, so a `&mut Link` handed out
/// by the arena can never break the chain.
pub struct Link<P: Ptr, T> {
    prev_next: (Option<P>, Option<P>),
    pub t: T,
}

impl<P: Ptr, T> Link<P, T> {
    /// Get a `Ptr` to the previous `Link` in the chain before `this`. Returns
    /// `None` if `this` is at the start of the chain.
    pub fn prev(this: &Link<P, T>) -> Option<P> {
        this.prev_next.0
    }

    /// Get a `Ptr` to the next `Link` in the chain after `this`. Returns
    /// `None` if `this` is at the end of the chain.
    pub fn next(this: &Link<P, T>) -> Option<P> {
        this.prev_next.1
    }

    /// Shorthand for `(Link::prev(this), Link::next(this))`
    pub fn prev_next(this: &Link<P, T>) -> (Option<P>, Option<P>) {
        this.prev_next
    }

    /// Construct a `Link` from its components
    pub fn new(prev_next: (Option<P>, Option<P>), t: T) -> Self {
        Self { prev_next, t }
    }
}

impl<P: Ptr, T> Deref for Link<P, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.t
    }
}

impl<P: Ptr, T> DerefMut for Link<P, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.t
    }
}

/// A doubly linked list on top of an `Arena`, with `O(1)` insertion and
/// removal anywhere in a chain. `OrdMultiMap` keeps all of its nodes in one
/// of these, and the chain through them is the global in-order list.
///
/// ```
/// use ord_multimap::{ptr_struct, ChainArena, Link};
///
/// ptr_struct!(P0);
/// let mut a: ChainArena<P0, &str> = ChainArena::new();
///
/// // `insert_new` starts a new single link chain
/// let p_a = a.insert_new("A");
/// let link = a.get(p_a).unwrap();
/// assert!(Link::prev(link).is_none());
/// assert!(Link::next(link).is_none());
///
/// // one known neighbor is enough, the other one is derived
/// let p_c = a.insert((Some(p_a), None), "C").unwrap();
/// let p_b = a.insert((None, Some(p_c)), "B").unwrap();
/// assert!(a.are_neighbors(p_a, p_b));
/// assert!(a.are_neighbors(p_b, p_c));
///
/// // removal reconnects the neighbors
/// assert_eq!(a.remove(p_b).unwrap().t, "B");
/// assert!(a.are_neighbors(p_a, p_c));
/// ```
pub struct ChainArena<P: Ptr, T> {
    pub(crate) a: Arena<P, Link<P, T>>,
}

/// # Note
///
/// `Ptr`s to links follow the same validity rules as `Ptr`s into a plain
/// `Arena`. The public interface cannot break the doubly linked invariant
/// that each interlink from one link to its neighbor has exactly one
/// corresponding interlink pointing back. External copies of interlinks may
/// go stale after operations on a neighboring link.
impl<P: Ptr, T> ChainArena<P, T> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        Arena::_check_invariants(&this.a)?;
        for (p, link) in &this.a {
            if let Some(prev) = Link::prev(link) {
                if prev == p {
                    return Err("link points to itself")
                }
                match this.a.get(prev) {
                    Some(prev) => {
                        if Link::next(prev) != Some(p) {
                            return Err("interlink does not correspond")
                        }
                    }
                    None => return Err("prev node does not exist"),
                }
            }
            // duplicate checks, but the invariants must not rely on induction
            if let Some(next) = Link::next(link) {
                if next == p {
                    return Err("link points to itself")
                }
                match this.a.get(next) {
                    Some(next) => {
                        if Link::prev(next) != Some(p) {
                            return Err("interlink does not correspond")
                        }
                    }
                    None => return Err("next node does not exist"),
                }
            }
        }
        Ok(())
    }

    pub fn new() -> Self {
        Self { a: Arena::new() }
    }

    /// Returns the number of links in the arena
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Returns if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Returns the capacity of the arena
    pub fn capacity(&self) -> usize {
        self.a.capacity()
    }

    /// Follows [Arena::gen]
    pub fn gen(&self) -> P::Gen {
        self.a.gen()
    }

    /// Follows [Arena::reserve]
    pub fn reserve(&mut self, additional: usize) {
        self.a.reserve(additional)
    }

    /// If `prev_next` is `(None, None)` then a new chain is started. Otherwise
    /// the link is spliced into an existing chain and the neighboring
    /// interlinks reroute to the new link. If only one neighbor is given, the
    /// other one is derived from it, so `(Some(p0), None)` inserts directly
    /// after `p0` even if `p0` is not the end of its chain. The `Ptr` to the
    /// new link is returned.
    ///
    /// # Errors
    ///
    /// If a `Ptr` is invalid, or `!self.are_neighbors(prev, next)`, then
    /// ownership of `t` is returned.
    pub fn insert(&mut self, prev_next: (Option<P>, Option<P>), t: T) -> Result<P, T> {
        let (p0, p1) = match prev_next {
            (None, None) => return Ok(self.insert_new(t)),
            (None, Some(p1)) => match self.a.get(p1) {
                Some(link) => (Link::prev(link), Some(p1)),
                None => return Err(t),
            },
            (Some(p0), None) => match self.a.get(p0) {
                Some(link) => (Some(p0), Link::next(link)),
                None => return Err(t),
            },
            (Some(p0), Some(p1)) => {
                if !self.are_neighbors(p0, p1) {
                    return Err(t)
                }
                (Some(p0), Some(p1))
            }
        };
        let res = self.a.insert(Link::new((p0, p1), t));
        // the neighbors are known to be valid at this point
        if let Some(p0) = p0 {
            self.a[p0].prev_next.1 = Some(res);
        }
        if let Some(p1) = p1 {
            self.a[p1].prev_next.0 = Some(res);
        }
        Ok(res)
    }

    /// Inserts `t` as a single link in a new chain and returns a `Ptr` to it
    pub fn insert_new(&mut self, t: T) -> P {
        self.a.insert(Link::new((None, None), t))
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        self.a.contains(p)
    }

    /// Returns if `p_prev` and `p_next` are neighbors on the same chain, such
    /// that `Link::next(self[p_prev]) == Some(p_next)`. This is directional.
    /// Returns `false` if `p_prev` or `p_next` are invalid.
    pub fn are_neighbors(&self, p_prev: P, p_next: P) -> bool {
        match self.a.get(p_prev) {
            // `p_next` must implicitly exist if the invariants hold
            Some(link) => Link::next(link) == Some(p_next),
            None => false,
        }
    }

    /// Returns a reference to the link pointed to by `p`. Returns `None` if
    /// `p` is invalid.
    #[must_use]
    pub fn get(&self, p: P) -> Option<&Link<P, T>> {
        self.a.get(p)
    }

    /// Returns a mutable reference to the `T` of the link pointed to by `p`.
    /// Returns `None` if `p` is invalid.
    #[must_use]
    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        self.a.get_mut(p).map(|link| &mut link.t)
    }

    /// Removes the link at `p`. The neighbors of `p` are rerouted to be
    /// neighbors of each other so that the chain remains continuous. Returns
    /// `None` if `p` is not valid.
    #[must_use]
    pub fn remove(&mut self, p: P) -> Option<Link<P, T>> {
        self.remove_internal(p, true)
    }

    #[must_use]
    pub(crate) fn remove_internal(&mut self, p: P, inc_gen: bool) -> Option<Link<P, T>> {
        let link = self.a.remove_internal(p, inc_gen)?;
        let (p0, p1) = Link::prev_next(&link);
        if let Some(p0) = p0 {
            self.a[p0].prev_next.1 = p1;
        }
        if let Some(p1) = p1 {
            self.a[p1].prev_next.0 = p0;
        }
        Some(link)
    }

    /// Invalidates all `Ptr`s and drops every link. The capacity is kept.
    pub fn clear(&mut self) {
        self.a.clear()
    }

    /// Performs a [ChainArena::clear] and resets capacity to 0
    pub fn clear_and_shrink(&mut self) {
        self.a.clear_and_shrink()
    }

    /// Follows [Arena::inc_gen]
    pub(crate) fn inc_gen(&mut self) {
        self.a.inc_gen()
    }

    /// Iteration over all valid `P`s in arena order (not chain order)
    pub fn ptrs(&self) -> crate::iterators::Ptrs<P, Link<P, T>> {
        self.a.ptrs()
    }

    /// Iteration over `(P, &Link<P, T>)` in arena order (not chain order)
    pub fn iter(&self) -> crate::iterators::Iter<P, Link<P, T>> {
        self.a.iter()
    }

    /// Like [ChainArena::get], except generation counters are ignored and the
    /// existing generation is returned.
    #[doc(hidden)]
    pub fn get_ignore_gen(&self, inx: P::Inx) -> Option<(P::Gen, &Link<P, T>)> {
        self.a.get_ignore_gen(inx)
    }

    /// Like [ChainArena::get], except generation counters are ignored and the
    /// result is unwrapped internally
    #[doc(hidden)]
    #[track_caller]
    pub fn get_inx_unwrap(&self, inx: P::Inx) -> &Link<P, T> {
        self.a.get_inx_unwrap(inx)
    }

    /// Like [ChainArena::get_mut], except generation counters are ignored and
    /// the result is unwrapped internally, and only the `&mut T` is
    /// returned
    #[doc(hidden)]
    #[track_caller]
    pub fn get_inx_mut_unwrap_t(&mut self, inx: P::Inx) -> &mut T {
        &mut self.a.get_inx_mut_unwrap(inx).t
    }
}

impl<P: Ptr, T, B: Borrow<P>> Index<B> for ChainArena<P, T> {
    type Output = T;

    fn index(&self, index: B) -> &Self::Output {
        self.get(*index.borrow())
            .map(|link| &link.t)
            .expect("indexed arena with invalidated `Ptr`")
    }
}

impl<P: Ptr, T, B: Borrow<P>> IndexMut<B> for ChainArena<P, T> {
    fn index_mut(&mut self, index: B) -> &mut Self::Output {
        self.get_mut(*index.borrow())
            .expect("indexed arena with invalidated `Ptr`")
    }
}

impl<P: Ptr, T: fmt::Debug> fmt::Debug for Link<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:?}, {:?}) {:?}",
            Link::prev(self),
            Link::next(self),
            self.t
        )
    }
}

impl<P: Ptr, T: Clone> Clone for Link<P, T> {
    fn clone(&self) -> Self {
        Self {
            prev_next: self.prev_next,
            t: self.t.clone(),
        }
    }
}

impl<P: Ptr, T: PartialEq> PartialEq for Link<P, T> {
    fn eq(&self, other: &Self) -> bool {
        (self.prev_next == other.prev_next) && (self.t == other.t)
    }
}

impl<P: Ptr, T: Eq> Eq for Link<P, T> {}

impl<P: Ptr, T: fmt::Debug> fmt::Debug for ChainArena<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.a)
    }
}

/// Has the `Ptr` preserving properties of `Arena::clone`
impl<P: Ptr, T: Clone> Clone for ChainArena<P, T> {
    fn clone(&self) -> Self {
        Self { a: self.a.clone() }
    }
}

impl<P: Ptr, T> Default for ChainArena<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::ptr_struct;

    ptr_struct!(P0);

    fn collect_chain(a: &ChainArena<P0, u32>, start: P0) -> Vec<u32> {
        let mut res = Vec::new();
        let mut tmp = Some(start);
        while let Some(p) = tmp {
            let link = a.get(p).unwrap();
            res.push(link.t);
            tmp = Link::next(link);
        }
        res
    }

    #[test]
    fn splice_and_remove() {
        let mut a: ChainArena<P0, u32> = ChainArena::new();
        let p0 = a.insert_new(0);
        let p2 = a.insert((Some(p0), None), 2).unwrap();
        let p1 = a.insert((Some(p0), Some(p2)), 1).unwrap();
        let p3 = a.insert((Some(p2), None), 3).unwrap();
        ChainArena::_check_invariants(&a).unwrap();
        assert_eq!(collect_chain(&a, p0), [0, 1, 2, 3]);
        // arena order follows insertion here, not the chain
        let ptrs: Vec<P0> = a.ptrs().collect();
        assert_eq!(ptrs, [p0, p2, p1, p3]);
        let ts: Vec<u32> = a.iter().map(|(_, link)| link.t).collect();
        assert_eq!(ts, [0, 2, 1, 3]);

        // not neighbors
        assert_eq!(a.insert((Some(p0), Some(p2)), 9), Err(9));

        assert_eq!(a.remove(p2).unwrap().t, 2);
        assert!(a.are_neighbors(p1, p3));
        assert!(a.remove(p2).is_none());
        assert_eq!(a.remove(p0).unwrap().t, 0);
        assert!(Link::prev(a.get(p1).unwrap()).is_none());
        ChainArena::_check_invariants(&a).unwrap();
        assert_eq!(collect_chain(&a, p1), [1, 3]);
        assert_eq!(a.len(), 2);

        a.clear();
        assert!(a.is_empty());
        assert!(!a.contains(p1));
        ChainArena::_check_invariants(&a).unwrap();
    }

    #[test]
    fn arena_reuse_invalidates() {
        let mut a: ChainArena<P0, u32> = ChainArena::new();
        let p0 = a.insert_new(0);
        let _ = a.remove(p0);
        let p1 = a.insert_new(1);
        // same entry, different generation
        assert_eq!(p0.inx(), p1.inx());
        assert!(a.get(p0).is_none());
        assert_eq!(a[p1], 1);
        a[p1] = 7;
        assert_eq!(*a.get_inx_mut_unwrap_t(p1.inx()), 7);
    }
}
