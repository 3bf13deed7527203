use core::mem;

use InternalEntry::*;

use crate::Ptr;

/// Internal entry for an `Arena`.
#[derive(Clone)]
pub(crate) enum InternalEntry<P: Ptr, T> {
    /// A free entry with no `T`. The index points to the next free entry,
    /// except if it points to this entry in which case it is the last free
    /// entry.
    Free(P::Inx),
    /// An entry allocated for a `(P::Gen, T)` pair in the arena.
    Allocated(P::Gen, T),
}

impl<P: Ptr, T> InternalEntry<P, T> {
    /// Returns the next freelist index, or `None` if `self` was already
    /// allocated (in which case nothing is replaced)
    #[inline]
    pub fn replace_free_with_allocated(&mut self, gen: P::Gen, t: T) -> Option<P::Inx> {
        if let Free(next) = self {
            let next = *next;
            *self = Allocated(gen, t);
            Some(next)
        } else {
            None
        }
    }

    /// Swaps an allocated entry for a freelist node, returning the generation
    /// and `T`. Returns `None` and does nothing if `self` is already free.
    #[inline]
    pub fn take_allocated(&mut self, next_free: P::Inx) -> Option<(P::Gen, T)> {
        if let Free(_) = self {
            return None
        }
        match mem::replace(self, Free(next_free)) {
            Allocated(gen, t) => Some((gen, t)),
            Free(_) => unreachable!(),
        }
    }
}
