//! Building the word map from a text source
//!
//! Words are maximal runs of bytes that are not separators. Each word is
//! inserted with the number of non-separator bytes before it in the whole
//! source, so offsets continue across lines.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::{debug, info};

use crate::{CipherError, Result, WordMap};

/// Bytes that split words
pub const SEPARATORS: &[u8] = b" ,.?!\n\r";

pub fn is_separator(b: u8) -> bool {
    SEPARATORS.contains(&b)
}

/// Inserts every word of `line` into `map`, starting at `offset` which is
/// advanced past the words. Returns the number of words.
pub fn index_line(line: &[u8], offset: &mut usize, map: &mut WordMap) -> usize {
    let mut words = 0;
    for word in line.split(|b| is_separator(*b)).filter(|w| !w.is_empty()) {
        map.insert(String::from_utf8_lossy(word).into_owned(), *offset);
        *offset += word.len();
        words += 1;
    }
    words
}

/// Indexes an in-memory text
///
/// ```
/// use offset_cipher::{indexer::index_text, WordMap};
///
/// let mut map = WordMap::new();
/// assert_eq!(index_text("THIS IS AN EXAMPLE", &mut map), 4);
/// let pairs: Vec<(&str, usize)> = map.iter().map(|(_, k, v)| (k.as_str(), *v)).collect();
/// assert_eq!(pairs, [("AN", 6), ("EXAMPLE", 8), ("IS", 4), ("THIS", 0)]);
/// ```
pub fn index_text(text: &str, map: &mut WordMap) -> usize {
    let mut offset = 0;
    index_line(text.as_bytes(), &mut offset, map)
}

/// Indexes `reader` line by line. Returns the number of words.
pub fn index_reader<R: BufRead>(mut reader: R, map: &mut WordMap) -> Result<usize> {
    let mut buf = Vec::new();
    let mut offset = 0;
    let mut words = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break
        }
        let n = index_line(&buf, &mut offset, map);
        debug!(bytes = buf.len(), words = n, "indexed line");
        words += n;
    }
    Ok(words)
}

/// Indexes the file at `path`. Returns the number of words.
pub fn index_file(path: &Path, map: &mut WordMap) -> Result<usize> {
    let file = File::open(path).map_err(|e| CipherError::io(path, e))?;
    let words = index_reader(BufReader::new(file), map).map_err(|e| e.at(path))?;
    info!(path = %path.display(), words, "indexed source");
    Ok(words)
}
