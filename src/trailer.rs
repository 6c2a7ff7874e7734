//! The 64-byte trailer at the end of the file.
//!
//! ```text
//! Offset (from end)  Size  Field
//!   -64                8   magic        = 45 4E 44 4D 41 46 00 00
//!   -56                8   metadataEnd  u64
//!   -48                4   checksum     u32, CRC-32/IEEE over the metadata region
//!   -44               44   reserved     zero on write
//! ```
//!
//! `checksum` is the only integrity check in MFAF; it covers
//! `bytes[metadataOffset .. metadataEnd)` exclusively.

use std::io::{Read, Write};

use crate::error::{Error, Result};
use crate::primitives::{magic_eq, read_exact_array, read_u32_le, read_u64_le, write_u32_le, write_u64_le, zero_fill};

pub const MAGIC: &[u8; 8] = &[0x45, 0x4E, 0x44, 0x4D, 0x41, 0x46, 0x00, 0x00];
pub const TRAILER_SIZE: usize = 64;
pub const RESERVED_SIZE: usize = 44;

#[derive(Debug, Clone, PartialEq)]
pub struct Trailer {
    pub metadata_end: u64,
    pub checksum: u32,
}

impl Trailer {
    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(MAGIC).map_err(Error::Io)?;
        write_u64_le(w, self.metadata_end)?;
        write_u32_le(w, self.checksum)?;
        zero_fill(w, RESERVED_SIZE)?;
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let buf: [u8; TRAILER_SIZE] = read_exact_array(r)?;

        if !magic_eq(&buf[0..8], MAGIC) {
            return Err(Error::Magic { offset: u64::MAX });
        }

        let metadata_end = read_u64_le(&buf[8..16], "metadataEnd")?;
        let checksum = read_u32_le(&buf[16..20], "checksum")?;

        Ok(Trailer { metadata_end, checksum })
    }
}
