//! The public façade. MFAF has no encrypted or solid mode, so unlike a
//! richer container's mode enum, an archive only ever has two states:
//! "being built in memory" and "loaded from a source".

use std::io::{Read, Seek, Write};

use crate::error::{Error, Result};
use crate::header::{self, CURRENT_VERSION};
use crate::metadata::{check_name_conflict, Entry};
use crate::reader::Reader;
use crate::writer::{assign_offsets, write_archive};

/// Anything the decoder can both read from and seek within — a `File`
/// opened lazily, or a `Cursor<Vec<u8>>` wrapping a fully-buffered image
/// read eagerly. Both share the exact same validation path.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Decode-time configuration. Encode has no equivalent knob — version and
/// flags are fixed by the encoder — there is no encode-time negotiation.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Reject unknown header flag bits and (reserved for future use)
    /// non-zero reserved bytes, rather than merely tolerating them.
    pub strict: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { strict: false }
    }
}

enum State {
    Building(Vec<Entry>),
    Loaded(Reader<Box<dyn ReadSeek>>),
}

/// An MFAF archive, either under construction or loaded from a source.
pub struct Archive {
    version: u16,
    flags: u16,
    state: State,
}

impl Archive {
    /// An empty archive: version 1, flags 0.
    pub fn new() -> Self {
        Self { version: CURRENT_VERSION, flags: 0, state: State::Building(Vec::new()) }
    }

    /// Append an entry. Rejects duplicate names with `NameConflict`
    /// without touching any already-staged entry.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        match &mut self.state {
            State::Building(entries) => {
                check_name_conflict(entries, &entry.name)?;
                entries.push(entry);
                Ok(())
            }
            State::Loaded(_) => Err(Error::Range { reason: "cannot add to a loaded archive; rebuild instead".into() }),
        }
    }

    /// Drive the encoder, writing a complete image to `sink`.
    pub fn save<W: Write>(&self, sink: &mut W) -> Result<()> {
        match &self.state {
            State::Building(entries) => {
                let mut offset_entries = entries.clone();
                assign_offsets(&mut offset_entries);
                write_archive(&offset_entries, self.version, self.flags, sink)
            }
            State::Loaded(_) => Err(Error::Range { reason: "loaded archives are read-only; rebuild to re-save".into() }),
        }
    }

    /// Drive the decoder with default (non-strict) options.
    pub fn load<R: Read + Seek + 'static>(source: R) -> Result<Self> {
        Self::load_with_options(source, DecodeOptions::default())
    }

    pub fn load_with_options<R: Read + Seek + 'static>(source: R, opts: DecodeOptions) -> Result<Self> {
        let reader = Reader::open(Box::new(source) as Box<dyn ReadSeek>, opts.strict)?;
        let version = reader.header.version;
        let flags = reader.header.flags;
        Ok(Self { version, flags, state: State::Loaded(reader) })
    }

    /// Entry names in archive (= insertion/serialization) order.
    pub fn names(&self) -> Vec<String> {
        match &self.state {
            State::Building(entries) => entries.iter().map(|e| e.name.clone()).collect(),
            State::Loaded(reader) => reader.entries.iter().map(|e| e.name.clone()).collect(),
        }
    }

    /// Look up an entry by name, materializing its content if the archive
    /// was loaded lazily. Returns `None` if no entry with that name exists.
    pub fn get(&mut self, name: &str) -> Result<Option<Entry>> {
        match &mut self.state {
            State::Building(entries) => Ok(entries.iter().find(|e| e.name == name).cloned()),
            State::Loaded(reader) => {
                let Some(idx) = reader.entries.iter().position(|e| e.name == name) else {
                    return Ok(None);
                };
                let content = reader.read_content(idx)?;
                let mut entry = reader.entries[idx].clone();
                entry.content = content;
                Ok(Some(entry))
            }
        }
    }

    /// Write `name`'s content to `sink` — equivalent to `get(name).content`
    /// piped through.
    pub fn extract<W: Write>(&mut self, name: &str, sink: &mut W) -> Result<()> {
        let entry = self
            .get(name)?
            .ok_or_else(|| Error::Range { reason: format!("no such entry: {name:?}") })?;
        sink.write_all(&entry.content).map_err(Error::Io)
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }
}

impl Default for Archive {
    fn default() -> Self {
        Self::new()
    }
}
