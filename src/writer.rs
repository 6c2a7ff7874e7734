//! The encoder.
//!
//! Fully streaming: every field in the header and trailer is computable
//! from the entry sizes before any byte is written, so [`write_archive`]
//! never writes a placeholder and seeks back to patch it — it never seeks
//! at all. It takes entries as input all at once rather than incrementally;
//! `add` only mutates the in-memory [`Entry`] list, and `save` is the
//! single point where bytes are produced.

use std::io::Write;

use crate::error::Result;
use crate::header::Header;
use crate::metadata::{to_raw_entries, Entry, CONTENT_OFFSET};
use crate::msgpack;
use crate::trailer::Trailer;
use crate::{crc, header, trailer};

/// Assign sequential, contiguous offsets to `entries` in input order (no
/// reordering, no compaction, no deduplication) and return the cursor
/// position immediately after the last entry, i.e. the archive's
/// `metadataOffset`.
pub fn assign_offsets(entries: &mut [Entry]) -> u64 {
    let mut cursor = CONTENT_OFFSET;
    for entry in entries.iter_mut() {
        entry.offset = cursor;
        cursor += entry.size();
    }
    cursor
}

/// Encode `entries` (already offset-assigned via [`assign_offsets`]) as a
/// complete MFAF image and write it to `w` in stream order: header, content,
/// metadata, trailer.
pub fn write_archive<W: Write>(entries: &[Entry], version: u16, flags: u16, w: &mut W) -> Result<()> {
    let metadata_offset = CONTENT_OFFSET + entries.iter().map(Entry::size).sum::<u64>();

    let raw = to_raw_entries(entries);
    let metadata_bytes = msgpack::encode(&raw)?;

    let metadata_end = metadata_offset + metadata_bytes.len() as u64;
    let total_size = metadata_end + trailer::TRAILER_SIZE as u64;
    let checksum = crc::crc32(&metadata_bytes);

    let header = Header {
        total_size,
        metadata_offset,
        file_count: entries.len() as u32,
        version,
        flags,
    };
    header.write(w)?;

    for entry in entries {
        w.write_all(&entry.content).map_err(crate::error::Error::Io)?;
    }

    w.write_all(&metadata_bytes).map_err(crate::error::Error::Io)?;

    let trailer = Trailer { metadata_end, checksum };
    trailer.write(w)?;

    Ok(())
}
