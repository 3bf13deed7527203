//! Error types for offset_cipher

use std::{io, path::PathBuf};

use ord_multimap::QueryError;
use thiserror::Error;

/// Result type alias using our error
pub type Result<T> = std::result::Result<T, CipherError>;

#[derive(Debug, Error)]
pub enum CipherError {
    /// Opening, reading, or writing a named file failed
    #[error("I/O error on `{}`", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Reading or writing a stream that has no path failed
    #[error("I/O error")]
    Stream(#[from] io::Error),

    /// The key query could not produce a key
    #[error("key query failed")]
    Query(#[from] QueryError),

    /// There is no offset to shift characters by
    #[error("the key is empty")]
    EmptyKey,

    /// The configuration file is not valid RON for `Config`
    #[error("invalid config file `{}`", .path.display())]
    Config {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    /// A range query is missing one of its bounds
    #[error("a range query needs both bounds (low: {low:?}, high: {high:?})")]
    InvalidRange {
        low: Option<String>,
        high: Option<String>,
    },
}

impl CipherError {
    /// Attaches `path` to a `Stream` error, other errors pass through
    pub fn at(self, path: impl Into<PathBuf>) -> Self {
        match self {
            CipherError::Stream(source) => CipherError::Io {
                path: path.into(),
                source,
            },
            e => e,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CipherError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_errors_get_paths() {
        let e = CipherError::Stream(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let e = e.at("plain.txt");
        assert!(matches!(e, CipherError::Io { ref path, .. } if path == &PathBuf::from("plain.txt")));
        assert_eq!(e.to_string(), "I/O error on `plain.txt`");

        let e = CipherError::EmptyKey.at("plain.txt");
        assert!(matches!(e, CipherError::EmptyKey));
    }
}
