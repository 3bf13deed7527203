//! Iterators for `Arena`

use core::{iter::Enumerate, slice};

use InternalEntry::*;

use crate::{arena::inx_at, Arena, InternalEntry, Ptr};

// Note: these wrap around slice iterators, the position from `Enumerate` is
// converted back into a `P::Inx`

/// An iterator over the valid `P`s of an `Arena`
pub struct Ptrs<'a, P: Ptr, T> {
    iter: Enumerate<slice::Iter<'a, InternalEntry<P, T>>>,
}

impl<'a, P: Ptr, T> Iterator for Ptrs<'a, P, T> {
    type Item = P;

    fn next(&mut self) -> Option<Self::Item> {
        for (i, entry) in self.iter.by_ref() {
            if let Allocated(gen, _) = entry {
                return Some(P::_from_raw(inx_at(i), *gen))
            }
        }
        None
    }
}

/// An iterator over `&T` in an `Arena`
pub struct Vals<'a, P: Ptr, T> {
    iter: slice::Iter<'a, InternalEntry<P, T>>,
}

impl<'a, P: Ptr, T> Iterator for Vals<'a, P, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.iter.by_ref() {
            if let Allocated(_, t) = entry {
                return Some(t)
            }
        }
        None
    }
}

/// An iterator over `(P, &T)` in an `Arena`
pub struct Iter<'a, P: Ptr, T> {
    iter: Enumerate<slice::Iter<'a, InternalEntry<P, T>>>,
}

impl<'a, P: Ptr, T> Iterator for Iter<'a, P, T> {
    type Item = (P, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        for (i, entry) in self.iter.by_ref() {
            if let Allocated(gen, t) = entry {
                return Some((P::_from_raw(inx_at(i), *gen), t))
            }
        }
        None
    }
}

impl<'a, P: Ptr, T> IntoIterator for &'a Arena<P, T> {
    type IntoIter = Iter<'a, P, T>;
    type Item = (P, &'a T);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// All the iterators here are in arena order, which has nothing to do with
/// insertion order
impl<P: Ptr, T> Arena<P, T> {
    /// Iteration over all valid `P`s in the arena
    pub fn ptrs(&self) -> Ptrs<P, T> {
        Ptrs {
            iter: self.m.iter().enumerate(),
        }
    }

    /// Iteration over `&T`
    pub fn vals(&self) -> Vals<P, T> {
        Vals {
            iter: self.m.iter(),
        }
    }

    /// Iteration over `(P, &T)` tuples
    pub fn iter(&self) -> Iter<P, T> {
        Iter {
            iter: self.m.iter().enumerate(),
        }
    }
}
