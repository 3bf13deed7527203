//! Derives a cipher key from the words of a source text and applies it as a
//! running offset substitution cipher.
//!
//! The source text is split into words which are inserted into a
//! [WordMap] together with their offset in the text. A query over the map
//! yields the key, a sequence of offsets. Each letter of the plaintext is
//! rotated by the next offset of the key.
//!
//! ```
//! use offset_cipher::{
//!     cipher::{transform_str, Direction},
//!     indexer::index_text,
//!     query::{key_from_map, KeyQuery},
//!     WordMap,
//! };
//!
//! let mut map = WordMap::new();
//! index_text("THIS IS AN EXAMPLE", &mut map);
//! let key = key_from_map(&map, &KeyQuery::InOrder).unwrap().unwrap();
//! assert_eq!(key.as_slice(), [6, 8, 4, 0]);
//!
//! let encrypted = transform_str("ATTACK AT DAWN", key.as_slice(), Direction::Encrypt).unwrap();
//! assert_eq!(encrypted, "GBXAIS ET JIAN");
//! let decrypted = transform_str(&encrypted, key.as_slice(), Direction::Decrypt).unwrap();
//! assert_eq!(decrypted, "ATTACK AT DAWN");
//! ```

pub mod cipher;
pub mod config;
mod error;
pub mod indexer;
pub mod key_file;
pub mod query;

pub use error::{CipherError, Result};
use ord_multimap::{ptr_struct, OrdMultiMap};

ptr_struct!(PWord doc = "Handle to one word occurrence in a `WordMap`");

/// Words of a source text mapped to their offsets
pub type WordMap = OrdMultiMap<PWord, String, usize>;
