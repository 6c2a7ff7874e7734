//! The decoder.
//!
//! Both "eager" (whole file buffered into a `Cursor<Vec<u8>>`) and "lazy"
//! (`File`, read on demand) modes share [`Reader::open`] — the validation
//! path never depends on how the bytes got there. Only content access
//! differs, and even that is unified here: both modes seek, so [`Reader`]
//! is generic over any `Read + Seek` source, with the trailer parsed
//! before the header since MFAF's framing is trailer-first.

use std::io::{Read, Seek, SeekFrom};

use crate::crc;
use crate::error::{Error, Result};
use crate::header::Header;
use crate::metadata::{validate_raw_entries, Entry};
use crate::msgpack;
use crate::trailer::Trailer;

/// Minimum file length: header + trailer with nothing in between. An
/// empty-array metadata region still needs room; the hard floor without
/// assuming anything about the metadata size is 128.
pub const MIN_ARCHIVE_SIZE: u64 = 128;

pub struct Reader<R> {
    source: R,
    pub header: Header,
    pub entries: Vec<Entry>,
}

impl<R: Read + Seek> Reader<R> {
    /// Parse and fully validate an MFAF image. `strict` is forwarded to
    /// [`Header::read`]'s unknown-flags policy.
    pub fn open(mut source: R, strict: bool) -> Result<Self> {
        let len = source.seek(SeekFrom::End(0)).map_err(Error::Io)?;
        if len < MIN_ARCHIVE_SIZE {
            return Err(Error::Size { reason: format!("archive length {len} is below the minimum {MIN_ARCHIVE_SIZE}") });
        }

        source.seek(SeekFrom::End(-(crate::trailer::TRAILER_SIZE as i64))).map_err(Error::Io)?;
        let trailer = Trailer::read(&mut source)?;

        source.seek(SeekFrom::Start(0)).map_err(Error::Io)?;
        let header = Header::read(&mut source, strict)?;

        // Cross-checks between header and trailer.
        if header.total_size != len {
            return Err(Error::Size { reason: format!("header totalSize {} does not match actual length {len}", header.total_size) });
        }
        if trailer.metadata_end + crate::trailer::TRAILER_SIZE as u64 != len {
            return Err(Error::Size {
                reason: format!("trailer metadataEnd {} + trailer size does not reach file length {len}", trailer.metadata_end),
            });
        }
        if !(crate::metadata::CONTENT_OFFSET <= header.metadata_offset
            && header.metadata_offset <= trailer.metadata_end
            && trailer.metadata_end <= len - crate::trailer::TRAILER_SIZE as u64)
        {
            return Err(Error::Size {
                reason: format!(
                    "offsets out of order: contentOffset={} metadataOffset={} metadataEnd={} totalSize={}",
                    crate::metadata::CONTENT_OFFSET, header.metadata_offset, trailer.metadata_end, len
                ),
            });
        }

        // Metadata slice + CRC.
        let metadata_len = (trailer.metadata_end - header.metadata_offset) as usize;
        source.seek(SeekFrom::Start(header.metadata_offset)).map_err(Error::Io)?;
        let mut metadata_bytes = vec![0u8; metadata_len];
        source.read_exact(&mut metadata_bytes).map_err(Error::Io)?;

        let actual_checksum = crc::crc32(&metadata_bytes);
        if actual_checksum != trailer.checksum {
            return Err(Error::Crc { expected: trailer.checksum, actual: actual_checksum });
        }

        // MessagePack decode + per-entry validation.
        let raw_entries = msgpack::decode(&metadata_bytes)?;
        let entries = validate_raw_entries(raw_entries, header.metadata_offset)?;

        // fileCount cross-check.
        if entries.len() as u32 != header.file_count {
            return Err(Error::Size {
                reason: format!("header fileCount {} does not match decoded entry count {}", header.file_count, entries.len()),
            });
        }

        Ok(Reader { source, header, entries })
    }

    /// Materialize the content bytes of entry `idx`. Idempotent and
    /// non-mutating with respect to archive state; the underlying source's
    /// cursor does move.
    pub fn read_content(&mut self, idx: usize) -> Result<Vec<u8>> {
        let entry = self
            .entries
            .get(idx)
            .ok_or_else(|| Error::Range { reason: format!("entry index {idx} out of range") })?;
        let (offset, size) = (entry.offset, entry.size());

        self.source.seek(SeekFrom::Start(offset)).map_err(Error::Io)?;
        let mut buf = vec![0u8; size as usize];
        self.source.read_exact(&mut buf).map_err(Error::Io)?;
        Ok(buf)
    }
}
