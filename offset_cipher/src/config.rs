//! Settings read from a RON file and overridden by the command line
//!
//! ```text
//! (
//!     query: Range,
//!     low: Some("AN"),
//!     high: Some("THIS"),
//!     key_out: Some("key.txt"),
//! )
//! ```
//!
//! Every field is optional, `()` is the default configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    query::{KeyQuery, QueryKind},
    CipherError, Result,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub query: QueryKind,
    /// Exclusive lower bound of a range query
    pub low: Option<String>,
    /// Exclusive upper bound of a range query
    pub high: Option<String>,
    /// Where to write the key report
    pub key_out: Option<PathBuf>,
}

impl Config {
    pub fn from_ron_str(s: &str) -> std::result::Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CipherError::io(path, e))?;
        let config = Self::from_ron_str(&text).map_err(|source| CipherError::Config {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Loads `path` if there is one, otherwise returns the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Replaces each setting that is given on the command line
    pub fn apply_overrides(
        &mut self,
        query: Option<QueryKind>,
        low: Option<String>,
        high: Option<String>,
        key_out: Option<PathBuf>,
    ) {
        if let Some(query) = query {
            self.query = query;
        }
        if low.is_some() {
            self.low = low;
        }
        if high.is_some() {
            self.high = high;
        }
        if key_out.is_some() {
            self.key_out = key_out;
        }
    }

    /// Resolves the settings into a runnable query. Bounds are ignored unless
    /// the query is `Range`, which needs both of them.
    pub fn key_query(&self) -> Result<KeyQuery> {
        Ok(match self.query {
            QueryKind::InOrder => KeyQuery::InOrder,
            QueryKind::Level => KeyQuery::Level,
            QueryKind::Range => match (&self.low, &self.high) {
                (Some(low), Some(high)) => KeyQuery::Range {
                    low: low.clone(),
                    high: high.clone(),
                },
                (low, high) => {
                    return Err(CipherError::InvalidRange {
                        low: low.clone(),
                        high: high.clone(),
                    })
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_use_defaults() {
        assert_eq!(Config::from_ron_str("()").unwrap(), Config::default());
        let config = Config::from_ron_str("(query: Level)").unwrap();
        assert_eq!(config.query, QueryKind::Level);
        assert_eq!(config.key_out, None);

        let config =
            Config::from_ron_str("(query: Range, low: Some(\"AN\"), high: Some(\"THIS\"))").unwrap();
        assert_eq!(
            config.key_query().unwrap(),
            KeyQuery::Range {
                low: "AN".to_owned(),
                high: "THIS".to_owned()
            }
        );
        assert!(Config::from_ron_str("(depth: 3)").is_err());
    }

    #[test]
    fn overrides_and_range_bounds() {
        let mut config = Config {
            query: QueryKind::Range,
            low: Some("A".to_owned()),
            high: None,
            key_out: Some(PathBuf::from("file_key.txt")),
        };
        assert!(matches!(
            config.key_query(),
            Err(CipherError::InvalidRange { low: Some(_), high: None })
        ));
        config.apply_overrides(None, None, Some("Z".to_owned()), None);
        assert_eq!(config.low.as_deref(), Some("A"));
        assert_eq!(config.key_out, Some(PathBuf::from("file_key.txt")));
        assert_eq!(
            config.key_query().unwrap(),
            KeyQuery::Range {
                low: "A".to_owned(),
                high: "Z".to_owned()
            }
        );
        config.apply_overrides(Some(QueryKind::InOrder), None, None, None);
        assert_eq!(config.key_query().unwrap(), KeyQuery::InOrder);
    }
}
