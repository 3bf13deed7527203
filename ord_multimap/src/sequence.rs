use alloc::{collections::TryReserveError, vec::Vec};
use core::{ops::Index, slice};

/// The capacity that growing sequences start at
pub(crate) const INITIAL_CAPACITY: usize = 4;

/// An owned sequence produced by the queries on an `OrdMultiMap`. Growth goes
/// through `try_reserve_exact` with capacity doubling, so allocation failure
/// is an error instead of an abort.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeySequence<T> {
    pub(crate) v: Vec<T>,
}

impl<T> KeySequence<T> {
    /// Creates an empty sequence with no allocation
    pub fn new() -> Self {
        Self { v: Vec::new() }
    }

    /// Creates an empty sequence with exactly `capacity` reserved
    pub fn with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut v = Vec::new();
        v.try_reserve_exact(capacity)?;
        Ok(Self { v })
    }

    /// Appends `t`, doubling the capacity if the sequence is full
    pub fn push(&mut self, t: T) -> Result<(), TryReserveError> {
        if self.v.len() == self.v.capacity() {
            let additional = self.v.capacity().max(INITIAL_CAPACITY);
            self.v.try_reserve_exact(additional)?;
        }
        self.v.push(t);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.v.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.v.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.v
    }

    pub fn iter(&self) -> slice::Iter<T> {
        self.v.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.v
    }
}

impl<T> From<Vec<T>> for KeySequence<T> {
    fn from(v: Vec<T>) -> Self {
        Self { v }
    }
}

impl<T> AsRef<[T]> for KeySequence<T> {
    fn as_ref(&self) -> &[T] {
        &self.v
    }
}

impl<T> Index<usize> for KeySequence<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.v[i]
    }
}

impl<'a, T> IntoIterator for &'a KeySequence<T> {
    type IntoIter = slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.v.iter()
    }
}

impl<T> IntoIterator for KeySequence<T> {
    type IntoIter = alloc::vec::IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.v.into_iter()
    }
}
