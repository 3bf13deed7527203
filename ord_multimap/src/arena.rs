use alloc::vec::Vec;
use core::{
    borrow::Borrow,
    fmt,
    num::NonZeroUsize,
    ops::{Index, IndexMut},
};

use InternalEntry::*;

use crate::{InternalEntry, Ptr, PtrGen, PtrInx};

/// Converts a zero based position in `Arena::m` into its `PtrInx`
#[inline]
pub(crate) fn inx_at<I: PtrInx>(i: usize) -> I {
    I::new(NonZeroUsize::new(i.wrapping_add(1)).unwrap())
}

/// Converts a `PtrInx` into its zero based position in `Arena::m`
#[inline]
pub(crate) fn pos_of<I: PtrInx>(inx: I) -> usize {
    I::get(inx).get().wrapping_sub(1)
}

/// An arena supporting non-Clone `T`, deletion, and optional generation
/// counters. It is the storage layer under `ChainArena` and `OrdMultiMap`.
///
/// `P` is a struct implementing `Ptr` (usually made with `ptr_struct!`),
/// whose associated types determine the index and generation types. When
/// several arenas are in play, give each its own `P` so the type system
/// rejects a handle used on the wrong arena.
///
/// ```
/// use ord_multimap::{ptr_struct, Arena};
///
/// ptr_struct!(P0);
///
/// let mut a: Arena<P0, &str> = Arena::new();
/// let p_this = a.insert("this");
/// let p_is = a.insert("is");
/// assert_eq!(a[p_is], "is");
///
/// assert_eq!(a.remove(p_this), Some("this"));
/// // generation counters make the removed handle permanently invalid, even
/// // after the entry is reused
/// let p_an = a.insert("an");
/// assert!(a.get(p_this).is_none());
/// assert_eq!(a[p_an], "an");
/// ```
pub struct Arena<P: Ptr, T> {
    /// Entry `inx` lives at `m[inx - 1]`
    ///
    /// # Invariants
    ///
    /// - The generation starts at 2, so that `Ptr::invalid` never validates
    /// - All `Free` entries form a single freelist starting at
    ///   `freelist_root`, and the last one points to itself
    /// - `freelist_root` is `None` if and only if there are no free entries
    /// - Every invalidation increments `gen`, and newer allocations use the
    ///   new value
    pub(crate) m: Vec<InternalEntry<P, T>>,
    /// Number of allocated entries
    pub(crate) len: usize,
    pub(crate) freelist_root: Option<P::Inx>,
    pub(crate) gen: P::Gen,
}

impl<P: Ptr, T> Arena<P, T> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        if this.gen() < P::Gen::two() {
            return Err("bad generation")
        }
        let n_allocated = this
            .m
            .iter()
            .filter(|entry| matches!(entry, Allocated(..)))
            .count();
        let n_free = this.m.len() - n_allocated;
        if this.len() != n_allocated {
            return Err("len != n_allocated")
        }
        let mut freelist_len = 0;
        if let Some(root) = this.freelist_root {
            let mut tmp_inx = root;
            for i in 0.. {
                if let Some(Free(inx)) = this.m_get(tmp_inx) {
                    freelist_len += 1;
                    if *inx == tmp_inx {
                        break
                    }
                    tmp_inx = *inx;
                } else {
                    return Err("bad freelist node")
                }
                if i > this.m.len() {
                    return Err("endless loop")
                }
            }
        }
        if freelist_len != n_free {
            return Err("freelist discontinuous")
        }
        Ok(())
    }

    /// Creates a new empty arena
    pub fn new() -> Arena<P, T> {
        Arena {
            m: Vec::new(),
            len: 0,
            freelist_root: None,
            gen: PtrGen::two(),
        }
    }

    /// Returns the number of `T` in the arena
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of entries (allocated or free) in the arena
    pub fn capacity(&self) -> usize {
        self.m.len()
    }

    /// Returns the arena generation counter, which is the number of
    /// invalidation operations performed on this arena plus 2
    #[inline]
    pub fn gen(&self) -> P::Gen {
        self.gen
    }

    #[inline]
    pub(crate) fn inc_gen(&mut self) {
        self.gen = PtrGen::increment(self.gen);
    }

    /// Reserves capacity for at least `additional` more `T`, capped at
    /// `P::Inx::max()` entries
    pub fn reserve(&mut self, additional: usize) {
        let end = self.m.len();
        let target = end
            .saturating_add(additional)
            .min(<P::Inx as PtrInx>::max().get());
        if target <= end {
            return
        }
        self.m.reserve(target.wrapping_sub(end));
        let old_root = self.freelist_root;
        self.freelist_root = Some(inx_at(end));
        // each new entry points to the next one
        for i in (end + 1)..target {
            self.m.push(Free(inx_at(i)));
        }
        match old_root {
            // the last new entry continues into the old freelist
            Some(old_root) => self.m.push(Free(old_root)),
            // or points to itself
            None => self.m.push(Free(inx_at(target.wrapping_sub(1)))),
        }
    }

    #[must_use]
    pub(crate) fn m_get(&self, inx: P::Inx) -> Option<&InternalEntry<P, T>> {
        self.m.get(pos_of(inx))
    }

    #[must_use]
    pub(crate) fn m_get_mut(&mut self, inx: P::Inx) -> Option<&mut InternalEntry<P, T>> {
        self.m.get_mut(pos_of(inx))
    }

    /// Tries to insert `t` without changing the capacity.
    ///
    /// # Errors
    ///
    /// Returns ownership of `t` if there are no free entries
    pub fn try_insert(&mut self, t: T) -> Result<P, T> {
        let inx = match self.freelist_root {
            Some(inx) => inx,
            None => return Err(t),
        };
        let gen = self.gen();
        let next = self
            .m_get_mut(inx)
            .and_then(|entry| entry.replace_free_with_allocated(gen, t))
            .expect("freelist root is not a free entry");
        self.freelist_root = if next == inx { None } else { Some(next) };
        self.len += 1;
        Ok(Ptr::_from_raw(inx, gen))
    }

    /// Inserts `t` and returns a `Ptr` to it. The capacity doubles when it
    /// runs out.
    pub fn insert(&mut self, t: T) -> P {
        match self.try_insert(t) {
            Ok(p) => p,
            Err(t) => {
                self.reserve(self.m.len().max(1));
                match self.try_insert(t) {
                    Ok(p) => p,
                    Err(_) => panic!(
                        "called `insert` on an arena with maximum length `P::Inx::max()`"
                    ),
                }
            }
        }
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        matches!(self.m_get(p.inx()), Some(Allocated(gen, _)) if *gen == p.gen())
    }

    /// Returns a reference to the `T` pointed to by `p`, or `None` if `p` is
    /// invalid
    #[must_use]
    pub fn get(&self, p: P) -> Option<&T> {
        match self.m_get(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// Returns a mutable reference to the `T` pointed to by `p`, or `None` if
    /// `p` is invalid
    #[must_use]
    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        match self.m_get_mut(p.inx()) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// `remove` with the generation increment optional, so that bulk removals
    /// only need one increment
    #[must_use]
    pub(crate) fn remove_internal(&mut self, p: P, inc_gen: bool) -> Option<T> {
        if !self.contains(p) {
            return None
        }
        let next_free = self.freelist_root.unwrap_or(p.inx());
        let (_, t) = self.m_get_mut(p.inx())?.take_allocated(next_free)?;
        self.freelist_root = Some(p.inx());
        self.len -= 1;
        if inc_gen {
            self.inc_gen();
        }
        Some(t)
    }

    /// Removes and returns the `T` pointed to by `p`, invalidating all `Ptr`s
    /// to it. Returns `None` and does nothing if `p` is invalid.
    #[must_use]
    pub fn remove(&mut self, p: P) -> Option<T> {
        self.remove_internal(p, true)
    }

    /// Drops all `T` and invalidates all pointers. The capacity is kept.
    pub fn clear(&mut self) {
        let cap = self.m.len();
        self.m.clear();
        self.len = 0;
        self.freelist_root = None;
        self.inc_gen();
        self.reserve(cap);
    }

    /// Performs a [Arena::clear] and resets the capacity to 0
    pub fn clear_and_shrink(&mut self) {
        self.m.clear();
        self.m.shrink_to_fit();
        self.len = 0;
        self.freelist_root = None;
        self.inc_gen();
    }

    /// Like [Arena::get], except the generation is ignored and returned
    #[doc(hidden)]
    pub fn get_ignore_gen(&self, inx: P::Inx) -> Option<(P::Gen, &T)> {
        match self.m_get(inx) {
            Some(Allocated(gen, t)) => Some((*gen, t)),
            _ => None,
        }
    }

    /// Like [Arena::get], except the generation is ignored and the result is
    /// unwrapped internally. Only for indexes that the caller knows are
    /// allocated.
    #[doc(hidden)]
    #[track_caller]
    pub fn get_inx_unwrap(&self, inx: P::Inx) -> &T {
        match self.m_get(inx) {
            Some(Allocated(_, t)) => t,
            _ => panic!("get_inx_unwrap on a free or out of bounds entry"),
        }
    }

    /// Mutable version of [Arena::get_inx_unwrap]
    #[doc(hidden)]
    #[track_caller]
    pub fn get_inx_mut_unwrap(&mut self, inx: P::Inx) -> &mut T {
        match self.m_get_mut(inx) {
            Some(Allocated(_, t)) => t,
            _ => panic!("get_inx_mut_unwrap on a free or out of bounds entry"),
        }
    }
}

impl<P: Ptr, T> Default for Arena<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implemented if `T: Clone`. `Ptr`s into the original are valid for the
/// same `T` in the clone.
impl<P: Ptr, T: Clone> Clone for Arena<P, T> {
    fn clone(&self) -> Self {
        Self {
            m: self.m.clone(),
            len: self.len,
            freelist_root: self.freelist_root,
            gen: self.gen,
        }
    }
}

impl<P: Ptr, T, B: Borrow<P>> Index<B> for Arena<P, T> {
    type Output = T;

    fn index(&self, inx: B) -> &T {
        self.get(*inx.borrow())
            .expect("indexed arena with invalidated `Ptr`")
    }
}

impl<P: Ptr, T, B: Borrow<P>> IndexMut<B> for Arena<P, T> {
    fn index_mut(&mut self, inx: B) -> &mut T {
        self.get_mut(*inx.borrow())
            .expect("indexed arena with invalidated `Ptr`")
    }
}

impl<P: Ptr, T: fmt::Debug> fmt::Debug for Arena<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::num::NonZeroU8;

    use super::*;
    use crate::ptr_struct;

    ptr_struct!(P0);
    ptr_struct!(P1[NonZeroU8]());

    #[test]
    fn freelist_reuse() {
        let mut a: Arena<P0, u64> = Arena::new();
        let ptrs: Vec<P0> = (0..10).map(|i| a.insert(i)).collect();
        Arena::_check_invariants(&a).unwrap();
        assert_eq!(a.len(), 10);
        assert!(a.capacity() >= 10);
        for p in &ptrs[2..5] {
            assert!(a.remove(*p).is_some());
        }
        Arena::_check_invariants(&a).unwrap();
        assert_eq!(a.len(), 7);
        let cap = a.capacity();
        let p = a.insert(100);
        // freed entries are reused before the capacity grows
        assert_eq!(a.capacity(), cap);
        assert_eq!(p.inx(), ptrs[4].inx());
        assert!(!a.contains(ptrs[4]));
        assert_eq!(a[p], 100);
        let vals: Vec<u64> = a.vals().copied().collect();
        assert_eq!(vals.len(), 8);
        assert_eq!(a.ptrs().count(), 8);
        a.clear();
        Arena::_check_invariants(&a).unwrap();
        assert_eq!(a.capacity(), cap);
        assert!(a.get(p).is_none());
        a.clear_and_shrink();
        assert_eq!(a.capacity(), 0);
        Arena::_check_invariants(&a).unwrap();
    }

    #[test]
    fn no_gen_and_limits() {
        let mut a: Arena<P1, u8> = Arena::new();
        for i in 0..255 {
            a.insert(i);
        }
        assert_eq!(a.len(), 255);
        assert_eq!(a.try_insert(0), Err(0));
        Arena::_check_invariants(&a).unwrap();
        // without generation counters `invalid` aliases the last entry
        assert_eq!(a.get(P1::invalid()), Some(&254));
    }
}
