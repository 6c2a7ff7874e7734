//! Binary primitives — little-endian fixed-width reads/writes and fixed-byte
//! magic handling, shared by the header and trailer codecs.
//!
//! All multi-byte fields in MFAF are little-endian. A read that would cross
//! the backing slice's bounds is reported as [`Error::Range`] rather than
//! panicking.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};

use crate::error::{Error, Result};

fn io_to_range(reason: &str, e: io::Error) -> Error {
    Error::Range { reason: format!("{reason}: {e}") }
}

pub fn read_u16_le(buf: &[u8], field: &str) -> Result<u16> {
    Cursor::new(buf).read_u16::<LittleEndian>().map_err(|e| io_to_range(field, e))
}

pub fn read_u32_le(buf: &[u8], field: &str) -> Result<u32> {
    Cursor::new(buf).read_u32::<LittleEndian>().map_err(|e| io_to_range(field, e))
}

pub fn read_u64_le(buf: &[u8], field: &str) -> Result<u64> {
    Cursor::new(buf).read_u64::<LittleEndian>().map_err(|e| io_to_range(field, e))
}

pub fn write_u16_le<W: Write>(w: &mut W, v: u16) -> Result<()> {
    w.write_u16::<LittleEndian>(v).map_err(Error::Io)
}

pub fn write_u32_le<W: Write>(w: &mut W, v: u32) -> Result<()> {
    w.write_u32::<LittleEndian>(v).map_err(Error::Io)
}

pub fn write_u64_le<W: Write>(w: &mut W, v: u64) -> Result<()> {
    w.write_u64::<LittleEndian>(v).map_err(Error::Io)
}

/// Compare `buf`'s leading bytes against a fixed magic sequence.
pub fn magic_eq(buf: &[u8], magic: &[u8]) -> bool {
    buf.len() >= magic.len() && &buf[..magic.len()] == magic
}

/// Read exactly `N` bytes from `r` into a fixed-size array.
pub fn read_exact_array<R: Read, const N: usize>(r: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(Error::Io)?;
    Ok(buf)
}

/// Zero-fill `n` bytes to `w` — used for the reserved regions on encode.
pub fn zero_fill<W: Write>(w: &mut W, n: usize) -> Result<()> {
    const ZEROS: [u8; 64] = [0u8; 64];
    let mut remaining = n;
    while remaining > 0 {
        let chunk = remaining.min(ZEROS.len());
        w.write_all(&ZEROS[..chunk]).map_err(Error::Io)?;
        remaining -= chunk;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_le_integers() {
        let mut buf = Vec::new();
        write_u16_le(&mut buf, 0xABCD).unwrap();
        write_u32_le(&mut buf, 0xDEAD_BEEF).unwrap();
        write_u64_le(&mut buf, 0x0123_4567_89AB_CDEF).unwrap();

        assert_eq!(read_u16_le(&buf[0..2], "x").unwrap(), 0xABCD);
        assert_eq!(read_u32_le(&buf[2..6], "x").unwrap(), 0xDEAD_BEEF);
        assert_eq!(read_u64_le(&buf[6..14], "x").unwrap(), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn truncated_buffer_yields_range_error() {
        let err = read_u32_le(&[0u8; 2], "x").unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn magic_eq_rejects_short_or_mismatched_buffers() {
        assert!(magic_eq(b"MAFFILE\x01tail", b"MAFFILE\x01"));
        assert!(!magic_eq(b"XAFFILE\x01tail", b"MAFFILE\x01"));
        assert!(!magic_eq(b"MAF", b"MAFFILE\x01"));
    }

    #[test]
    fn zero_fill_writes_exact_count_of_zero_bytes() {
        let mut buf = Vec::new();
        zero_fill(&mut buf, 24).unwrap();
        assert_eq!(buf.len(), 24);
        assert!(buf.iter().all(|&b| b == 0));
    }
}
