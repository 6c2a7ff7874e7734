//! # mfaf — Multi-File Archive Format codec core
//!
//! Format guarantees:
//! - All numeric fields are little-endian.
//! - A fixed 64-byte header opens the file; a fixed 64-byte trailer closes
//!   it. Decoding always starts from the trailer — the format is not
//!   streamable without seeking to the last 64 bytes.
//! - The metadata region is a MessagePack array of maps, CRC-32/IEEE
//!   checked; unknown keys are forward-compatible and silently ignored.
//! - Content offsets are assigned once, in input order, with no
//!   compaction, reordering, or deduplication.
//!
//! ```no_run
//! use mfaf::archive::Archive;
//! use mfaf::metadata::Entry;
//!
//! let mut ar = Archive::new();
//! ar.add(Entry::new("readme.txt", b"Hello, world!".to_vec()))?;
//! let mut buf = Vec::new();
//! ar.save(&mut buf)?;
//!
//! let mut loaded = Archive::load(std::io::Cursor::new(buf))?;
//! assert_eq!(loaded.get("readme.txt")?.unwrap().content, b"Hello, world!");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod crc;
pub mod error;
pub mod header;
pub mod metadata;
pub mod msgpack;
pub mod primitives;
pub mod reader;
pub mod trailer;
pub mod writer;

pub use archive::{Archive, DecodeOptions};
pub use error::{Error, Result};
pub use header::Header;
pub use metadata::Entry;
pub use msgpack::{AttributeMap, AttributeValue};
pub use trailer::Trailer;
