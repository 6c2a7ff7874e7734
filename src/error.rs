//! Crate-wide error taxonomy.
//!
//! One enum for the whole core, unlike the per-subsystem `thiserror` enums
//! a multi-codec archive format needs — MFAF has a single decode/encode path
//! and a single taxonomy: `MagicError`, `SizeError`, `CrcError`,
//! `RangeError`, `MessagePackError`, `VersionError`, `NameConflict`.

use std::io;
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("magic mismatch at byte {offset}: not an MFAF archive")]
    Magic { offset: u64 },

    #[error("size/offset inconsistency: {reason}")]
    Size { reason: String },

    #[error("metadata CRC32 mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    #[error("invalid entry data: {reason}")]
    Range { reason: String },

    #[error("MessagePack error: {0}")]
    MessagePack(String),

    #[error("unsupported format version {version} (this build supports up to {max})")]
    Version { version: u16, max: u16 },

    #[error("duplicate entry name: {name:?}")]
    NameConflict { name: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Error::MessagePack(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::MessagePack(e.to_string())
    }
}
