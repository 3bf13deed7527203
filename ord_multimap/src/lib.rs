//! An ordered multi-map on an arena. Distinct keys are kept on an AVL tree,
//! equal keys form runs in insertion order, and every node is threaded into
//! one global in-order chain. Nodes are addressed through generation checked
//! `Ptr` handles that are declared with [ptr_struct].
//!
//! ```
//! use ord_multimap::{ptr_struct, OrdMultiMap};
//!
//! ptr_struct!(P0);
//!
//! let mut map: OrdMultiMap<P0, String, usize> = OrdMultiMap::new();
//! for (offset, word) in [(0, "THIS"), (4, "IS"), (6, "AN"), (8, "EXAMPLE")] {
//!     map.insert(word.to_owned(), offset);
//! }
//! let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
//! assert_eq!(keys, ["AN", "EXAMPLE", "IS", "THIS"]);
//!
//! let range = map.range_sequence("AN", "THIS").unwrap();
//! assert_eq!(range.as_slice(), [8, 4]);
//! ```

#![no_std]
// because `Ptr` is based on user-controlled code we will not use unsafe code
#![deny(unsafe_code)]
// false positives
#![allow(clippy::while_let_on_iterator)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod arena;
mod chain;
mod entry;
pub mod iterators;
mod multimap;
pub mod multimap_iterators;
mod ptr;
mod query;
mod sequence;
mod traits;

pub use arena::Arena;
pub use chain::{ChainArena, Link};
pub(crate) use entry::InternalEntry;
pub use multimap::{Drain, Node, OrdMultiMap};
pub use ptr::{Ptr, PtrGen, PtrInx};
pub use query::QueryError;
pub use sequence::KeySequence;
#[cfg(feature = "serde_support")]
pub use traits::serde;
