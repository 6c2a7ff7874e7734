//! The 64-byte header at offset 0.
//!
//! ```text
//! Offset  Size  Field
//!    0      8   magic            = 4D 41 46 46 49 4C 45 01
//!    8      8   totalSize        u64
//!   16      8   contentOffset    u64, always 64
//!   24      8   metadataOffset   u64
//!   32      4   fileCount        u32
//!   36      2   version          u16, currently 1
//!   38      2   flags            u16 — bit0 compressed, bit1 encrypted
//!   40     24   reserved         zero on write
//! ```
//!
//! The header carries no CRC of its own — the only checksum in MFAF covers
//! the metadata region, and lives in the trailer.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::metadata::CONTENT_OFFSET;
use crate::primitives::{magic_eq, read_exact_array, read_u16_le, read_u32_le, read_u64_le, write_u16_le, write_u32_le, write_u64_le, zero_fill};

pub const MAGIC: &[u8; 8] = &[0x4D, 0x41, 0x46, 0x46, 0x49, 0x4C, 0x45, 0x01];
pub const HEADER_SIZE: usize = 64;
pub const RESERVED_SIZE: usize = 24;

pub const CURRENT_VERSION: u16 = 1;
pub const MAX_SUPPORTED_VERSION: u16 = 1;

/// Content region is compressed as a single zstd stream (payload transform
/// unspecified by the core — the core only carries the bit).
pub const FLAG_COMPRESSED: u16 = 1 << 0;
/// Content and metadata regions are ciphertext (payload transform
/// unspecified by the core — the core only carries the bit).
pub const FLAG_ENCRYPTED: u16 = 1 << 1;
const KNOWN_FLAGS: u16 = FLAG_COMPRESSED | FLAG_ENCRYPTED;

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub total_size: u64,
    pub metadata_offset: u64,
    pub file_count: u32,
    pub version: u16,
    pub flags: u16,
}

impl Header {
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(MAGIC).map_err(Error::Io)?;
        write_u64_le(w, self.total_size)?;
        write_u64_le(w, CONTENT_OFFSET)?;
        write_u64_le(w, self.metadata_offset)?;
        write_u32_le(w, self.file_count)?;
        write_u16_le(w, self.version)?;
        write_u16_le(w, self.flags)?;
        zero_fill(w, RESERVED_SIZE)?;
        Ok(())
    }

    /// Parse and validate a header. `strict` additionally rejects unknown
    /// flag bits with a `VersionError`; non-strict mode tolerates them.
    pub fn read<R: Read>(r: &mut R, strict: bool) -> Result<Self> {
        let buf: [u8; HEADER_SIZE] = read_exact_array(r)?;

        if !magic_eq(&buf[0..8], MAGIC) {
            return Err(Error::Magic { offset: 0 });
        }

        let total_size = read_u64_le(&buf[8..16], "totalSize")?;
        let content_offset = read_u64_le(&buf[16..24], "contentOffset")?;
        let metadata_offset = read_u64_le(&buf[24..32], "metadataOffset")?;
        let file_count = read_u32_le(&buf[32..36], "fileCount")?;
        let version = read_u16_le(&buf[36..38], "version")?;
        let flags = read_u16_le(&buf[38..40], "flags")?;

        if content_offset != CONTENT_OFFSET {
            return Err(Error::Size {
                reason: format!("contentOffset is {content_offset}, expected {CONTENT_OFFSET}"),
            });
        }
        if version > MAX_SUPPORTED_VERSION {
            return Err(Error::Version { version, max: MAX_SUPPORTED_VERSION });
        }
        if strict && (flags & !KNOWN_FLAGS) != 0 {
            return Err(Error::Version { version, max: MAX_SUPPORTED_VERSION });
        }

        Ok(Header { total_size, metadata_offset, file_count, version, flags })
    }

    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }
}
