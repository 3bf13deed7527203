//! Choosing which values of the word map become the key

use std::{fmt, path::Path};

use ord_multimap::{KeySequence, QueryError};
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{indexer::index_file, Result, WordMap};

/// The query without its arguments, as selected on the command line or in a
/// config file
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum QueryKind {
    /// Every offset in word order
    #[default]
    InOrder,
    /// The offsets of the tree level holding the most repeated word
    Level,
    /// The offsets of words strictly between `low` and `high`
    Range,
}

/// A fully specified query over a `WordMap`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery {
    InOrder,
    Level,
    Range { low: String, high: String },
}

impl KeyQuery {
    pub fn kind(&self) -> QueryKind {
        match self {
            KeyQuery::InOrder => QueryKind::InOrder,
            KeyQuery::Level => QueryKind::Level,
            KeyQuery::Range { .. } => QueryKind::Range,
        }
    }

    /// Runs the query. `QueryError::EmptyMap` is returned for an empty map.
    pub fn run(&self, map: &WordMap) -> core::result::Result<KeySequence<usize>, QueryError> {
        match self {
            KeyQuery::InOrder => map.in_order_sequence(),
            KeyQuery::Level => map.max_frequency_level_sequence(),
            KeyQuery::Range { low, high } => map.range_sequence(low.as_str(), high.as_str()),
        }
    }
}

impl fmt::Display for KeyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyQuery::InOrder => f.write_str("in-order"),
            KeyQuery::Level => f.write_str("level"),
            KeyQuery::Range { low, high } => write!(f, "range({low:?}, {high:?})"),
        }
    }
}

/// Runs `query` on an already built map. An empty map has no key and results
/// in `Ok(None)`.
///
/// ```
/// use offset_cipher::{indexer::index_text, query::{key_from_map, KeyQuery}, WordMap};
///
/// let mut map = WordMap::new();
/// index_text("THIS IS AN EXAMPLE", &mut map);
/// let query = KeyQuery::Range {
///     low: "AN".to_owned(),
///     high: "THIS".to_owned(),
/// };
/// let key = key_from_map(&map, &query).unwrap().unwrap();
/// assert_eq!(key.as_slice(), [8, 4]);
///
/// assert!(key_from_map(&WordMap::new(), &query).unwrap().is_none());
/// ```
pub fn key_from_map(map: &WordMap, query: &KeyQuery) -> Result<Option<KeySequence<usize>>> {
    if let Some(root) = map.root() {
        debug!(
            nodes = map.len(),
            root_height = map.height(root).unwrap_or(0),
            "word map statistics"
        );
    }
    match query.run(map) {
        Ok(key) => {
            info!(%query, len = key.len(), "derived key");
            Ok(Some(key))
        }
        Err(QueryError::EmptyMap) => {
            info!(%query, "no words to derive a key from");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Indexes the file at `source` and runs `query` on the result
pub fn derive_key(source: &Path, query: &KeyQuery) -> Result<Option<KeySequence<usize>>> {
    let mut map = WordMap::new();
    index_file(source, &mut map)?;
    key_from_map(&map, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::index_text;

    #[test]
    fn queries_on_words() {
        let mut map = WordMap::new();
        // representatives are A(0), B(1), C(3) with B at the root
        index_text("A B B C", &mut map);
        assert_eq!(
            KeyQuery::InOrder.run(&map).unwrap().as_slice(),
            [0, 1, 2, 3]
        );
        assert_eq!(KeyQuery::Level.run(&map).unwrap().as_slice(), [1, 2]);
        let range = KeyQuery::Range {
            low: "A".to_owned(),
            high: "C".to_owned(),
        };
        assert_eq!(range.run(&map).unwrap().as_slice(), [1, 2]);
        assert_eq!(range.kind(), QueryKind::Range);
        assert_eq!(range.to_string(), "range(\"A\", \"C\")");
    }

    #[test]
    fn empty_range_is_not_absent() {
        let mut map = WordMap::new();
        index_text("A B", &mut map);
        let query = KeyQuery::Range {
            low: "B".to_owned(),
            high: "A".to_owned(),
        };
        let key = key_from_map(&map, &query).unwrap().unwrap();
        assert!(key.is_empty());
    }
}
