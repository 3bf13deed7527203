//! The text report of a key, reduced to the offsets the cipher actually uses

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{cipher::ALPHABET_LEN, CipherError, Result};

/// Number of offsets per line of the report
pub const OFFSETS_PER_LINE: usize = 10;

/// Writes the report of `key` to `w`, or a notice if there is no key
///
/// ```
/// use offset_cipher::key_file::write_key;
///
/// let mut out: Vec<u8> = Vec::new();
/// write_key(&mut out, Some(&[0, 27, 52][..])).unwrap();
/// assert_eq!(out, b"Decryption key of length 3 is:\n0 1 0 ");
///
/// let mut out: Vec<u8> = Vec::new();
/// write_key(&mut out, None).unwrap();
/// assert_eq!(out, b"No key provided!\n");
/// ```
pub fn write_key<W: Write>(mut w: W, key: Option<&[usize]>) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => {
            w.write_all(b"No key provided!\n")?;
            w.flush()?;
            return Ok(())
        }
    };
    writeln!(w, "Decryption key of length {} is:", key.len())?;
    for (i, offset) in key.iter().enumerate() {
        write!(w, "{} ", offset % ALPHABET_LEN)?;
        if (i + 1) % OFFSETS_PER_LINE == 0 {
            writeln!(w)?;
        }
    }
    w.flush()?;
    Ok(())
}

/// Writes the report of `key` to the file at `path`
pub fn write_key_file(path: &Path, key: Option<&[usize]>) -> Result<()> {
    let file = File::create(path).map_err(|e| CipherError::io(path, e))?;
    write_key(BufWriter::new(file), key).map_err(|e| e.at(path))?;
    info!(path = %path.display(), len = ?key.map(|k| k.len()), "wrote key");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_breaks_every_ten() {
        let key: Vec<usize> = (0..21).collect();
        let mut out: Vec<u8> = Vec::new();
        write_key(&mut out, Some(key.as_slice())).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Decryption key of length 21 is:\n0 1 2 3 4 5 6 7 8 9 \n10 11 12 13 14 15 16 17 18 \
             19 \n20 "
        );
    }
}
