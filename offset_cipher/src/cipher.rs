//! Running offset substitution cipher
//!
//! Every byte other than space, `\n`, and `\r` consumes the next offset of
//! the key, cycling back to the start of the key at its end. ASCII letters
//! are uppercased and rotated by `offset % 26`, other consuming bytes are
//! copied unchanged. The key position carries over between lines.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use tracing::{debug, info, warn};

use crate::{CipherError, Result};

/// The number of letters rotated over
pub const ALPHABET_LEN: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Returns if `b` consumes a key offset
pub fn consumes_offset(b: u8) -> bool {
    !matches!(b, b' ' | b'\n' | b'\r')
}

/// Rotates a single byte by `offset`. Bytes other than ASCII letters are
/// returned unchanged.
pub fn shift_byte(b: u8, offset: usize, direction: Direction) -> u8 {
    if !b.is_ascii_alphabetic() {
        return b
    }
    let letter = b.to_ascii_uppercase() - b'A';
    // always less than 26
    let shift = (offset % ALPHABET_LEN) as u8;
    let rotated = match direction {
        Direction::Encrypt => (letter + shift) % 26,
        Direction::Decrypt => (letter + 26 - shift) % 26,
    };
    rotated + b'A'
}

/// Position in a key that wraps around
#[derive(Debug, Clone)]
pub struct KeyCursor<'a> {
    key: &'a [usize],
    i: usize,
}

impl<'a> KeyCursor<'a> {
    /// Returns `CipherError::EmptyKey` for an empty key
    pub fn new(key: &'a [usize]) -> Result<Self> {
        if key.is_empty() {
            warn!("refusing to transform with an empty key");
            return Err(CipherError::EmptyKey)
        }
        Ok(Self { key, i: 0 })
    }

    /// Transforms `buf` in place, consuming offsets as needed
    pub fn apply(&mut self, buf: &mut [u8], direction: Direction) {
        for b in buf.iter_mut() {
            if consumes_offset(*b) {
                *b = shift_byte(*b, self.key[self.i], direction);
                self.i += 1;
                if self.i == self.key.len() {
                    self.i = 0;
                }
            }
        }
    }
}

/// Transforms everything from `reader` into `writer`, line by line. Returns
/// the number of bytes processed.
pub fn transform<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    key: &[usize],
    direction: Direction,
) -> Result<usize> {
    let mut cursor = KeyCursor::new(key)?;
    let mut buf = Vec::new();
    let mut total = 0;
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break
        }
        cursor.apply(&mut buf, direction);
        writer.write_all(&buf)?;
        debug!(bytes = n, "transformed line");
        total += n;
    }
    writer.flush()?;
    Ok(total)
}

/// Convenience for in-memory text
///
/// ```
/// use offset_cipher::cipher::{transform_str, Direction};
///
/// let key = [1, 2, 3, 4];
/// let encrypted = transform_str("AAAA aaaa", &key, Direction::Encrypt).unwrap();
/// assert_eq!(encrypted, "BCDE BCDE");
/// let decrypted = transform_str(&encrypted, &key, Direction::Decrypt).unwrap();
/// assert_eq!(decrypted, "AAAA AAAA");
/// ```
pub fn transform_str(text: &str, key: &[usize], direction: Direction) -> Result<String> {
    let mut out = Vec::with_capacity(text.len());
    transform(text.as_bytes(), &mut out, key, direction)?;
    // only ASCII letters are changed, and only into ASCII letters
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn transform_file(input: &Path, output: &Path, key: &[usize], direction: Direction) -> Result<usize> {
    // fail on the key before any file is touched
    KeyCursor::new(key)?;
    let reader = BufReader::new(File::open(input).map_err(|e| CipherError::io(input, e))?);
    let writer = BufWriter::new(File::create(output).map_err(|e| CipherError::io(output, e))?);
    let bytes = match transform(reader, writer, key, direction) {
        Ok(bytes) => bytes,
        // there is no telling which side failed, so the output is named
        Err(e) => return Err(e.at(output)),
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        ?direction,
        bytes,
        "transformed file"
    );
    Ok(bytes)
}

/// Encrypts the file at `input` into `output`. Returns the number of bytes.
pub fn encrypt_file(input: &Path, output: &Path, key: &[usize]) -> Result<usize> {
    transform_file(input, output, key, Direction::Encrypt)
}

/// Decrypts the file at `input` into `output`. Returns the number of bytes.
pub fn decrypt_file(input: &Path, output: &Path, key: &[usize]) -> Result<usize> {
    transform_file(input, output, key, Direction::Decrypt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps() {
        assert_eq!(shift_byte(b'Z', 1, Direction::Encrypt), b'A');
        assert_eq!(shift_byte(b'A', 1, Direction::Decrypt), b'Z');
        assert_eq!(shift_byte(b'y', 27, Direction::Encrypt), b'Z');
        assert_eq!(shift_byte(b'Q', 26 * 3, Direction::Decrypt), b'Q');
        // not letters
        assert_eq!(shift_byte(b'7', 5, Direction::Encrypt), b'7');
        assert_eq!(shift_byte(b',', 5, Direction::Decrypt), b',');
    }

    #[test]
    fn offsets_continue_across_lines() {
        let key = [0, 1, 2];
        let out = transform_str("AA\r\nA A-A", &key, Direction::Encrypt).unwrap();
        // `-` consumes the offset 1 without changing
        assert_eq!(out, "AB\r\nC A-C");
    }

    #[test]
    fn empty_key() {
        assert!(matches!(
            transform_str("A", &[], Direction::Encrypt),
            Err(CipherError::EmptyKey)
        ));
    }
}
