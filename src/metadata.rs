//! Typed entry descriptor and metadata validation.
//!
//! After the wire adapter ([`crate::msgpack`]) decodes the raw MessagePack
//! array, every element is lifted into an [`Entry`] and checked: non-empty
//! unique names, in-bounds non-overlapping content ranges, and bounded
//! attribute nesting.

use crate::error::{Error, Result};
use crate::msgpack::{AttributeMap, AttributeValue, RawEntry, MAX_ATTRIBUTE_DEPTH, MAX_ATTRIBUTE_KEY_LEN};

pub const CONTENT_OFFSET: u64 = 64;

/// A single named byte stream plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    pub content: Vec<u8>,
    pub mime_type: String,
    pub attributes: AttributeMap,
    /// Byte offset of `content` within the archive's content region.
    pub offset: u64,
    /// Content length. The authoritative source of truth for an entry's
    /// size: for a loaded entry this comes straight off the wire and holds
    /// even before `content` is materialized; for a building entry it is
    /// fixed at construction time from the content handed to [`Entry::new`].
    size: u64,
}

impl Entry {
    /// Build a new, not-yet-offset entry for an archive under construction.
    /// `offset` is assigned later by the encoder.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        let size = content.len() as u64;
        Self {
            name: name.into(),
            content,
            mime_type: "application/octet-stream".to_string(),
            attributes: AttributeMap::new(),
            offset: 0,
            size,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    fn to_raw(&self) -> RawEntry {
        RawEntry {
            n: self.name.clone(),
            o: self.offset,
            s: self.size(),
            m: self.mime_type.clone(),
            a: self.attributes.clone(),
        }
    }

    /// Lift a decoded [`RawEntry`] into a validated [`Entry`], without its
    /// content bytes (those are sliced separately by the reader once all
    /// entries have passed range validation). `size` is taken from the wire
    /// value, not from `content` (which is empty until the reader fills it
    /// in) — that wire value is what `read_content` and the range/overlap
    /// checks below rely on.
    fn from_raw(raw: RawEntry) -> Result<Self> {
        if raw.n.is_empty() {
            return Err(Error::Range { reason: "entry name must be non-empty".into() });
        }
        raw.o
            .checked_add(raw.s)
            .ok_or_else(|| Error::Range { reason: format!("entry {:?}: offset+size overflows u64", raw.n) })?;
        check_attribute_map(&raw.a, 1, &raw.n)?;

        Ok(Entry {
            name: raw.n,
            content: Vec::new(),
            mime_type: raw.m,
            attributes: raw.a,
            offset: raw.o,
            size: raw.s,
        })
    }
}

/// Serialize `entries` to the wire `RawEntry` array, in input order
/// (no reordering).
pub fn to_raw_entries(entries: &[Entry]) -> Vec<RawEntry> {
    entries.iter().map(Entry::to_raw).collect()
}

/// Lift a decoded raw array into validated [`Entry`] values (content-less)
/// and check the cross-entry invariants: uniqueness, in-bounds disjoint
/// ranges. `metadata_offset` is the upper bound every entry's
/// `[offset, offset+size)` range must fit under.
pub fn validate_raw_entries(raw: Vec<RawEntry>, metadata_offset: u64) -> Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(raw.len());
    for r in raw {
        entries.push(Entry::from_raw(r)?);
    }

    let mut seen_names = std::collections::HashSet::with_capacity(entries.len());
    for e in &entries {
        if !seen_names.insert(e.name.as_str()) {
            return Err(Error::Range { reason: format!("duplicate entry name: {:?}", e.name) });
        }
        if e.offset < CONTENT_OFFSET {
            return Err(Error::Range {
                reason: format!("entry {:?} offset {} precedes content region start {}", e.name, e.offset, CONTENT_OFFSET),
            });
        }
        let end = e.offset + e.size();
        if end > metadata_offset {
            return Err(Error::Range {
                reason: format!(
                    "entry {:?} range [{}, {}) extends past metadata offset {}",
                    e.name, e.offset, end, metadata_offset
                ),
            });
        }
    }

    // Pairwise disjointness. Zero-length ranges never overlap anything,
    // including each other at a shared offset, so they are excluded before
    // the adjacent-pair scan rather than relied on to sort into a safe
    // position next to it.
    let mut ranges: Vec<(u64, u64, &str)> = entries
        .iter()
        .map(|e| (e.offset, e.offset + e.size(), e.name.as_str()))
        .filter(|&(start, end, _)| start != end)
        .collect();
    ranges.sort_by_key(|&(start, end, _)| (start, end));
    for w in ranges.windows(2) {
        let (_, end_a, name_a) = w[0];
        let (start_b, _, name_b) = w[1];
        if start_b < end_a {
            return Err(Error::Range {
                reason: format!("entries {name_a:?} and {name_b:?} have overlapping content ranges"),
            });
        }
    }

    Ok(entries)
}

/// Check name uniqueness among entries staged for encoding: `add` rejects
/// duplicates with `NameConflict` before anything is written.
pub fn check_name_conflict(entries: &[Entry], new_name: &str) -> Result<()> {
    if entries.iter().any(|e| e.name == new_name) {
        return Err(Error::NameConflict { name: new_name.to_string() });
    }
    Ok(())
}

fn check_attribute_map(map: &AttributeMap, depth: usize, entry_name: &str) -> Result<()> {
    if depth > MAX_ATTRIBUTE_DEPTH {
        return Err(Error::Range {
            reason: format!("entry {entry_name:?}: attributes nested deeper than {MAX_ATTRIBUTE_DEPTH}"),
        });
    }
    for (key, value) in map {
        if key.len() > MAX_ATTRIBUTE_KEY_LEN {
            return Err(Error::Range {
                reason: format!("entry {entry_name:?}: attribute key {key:?} exceeds {MAX_ATTRIBUTE_KEY_LEN} bytes"),
            });
        }
        if let AttributeValue::Map(nested) = value {
            check_attribute_map(nested, depth + 1, entry_name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::AttributeValue;

    fn raw(name: &str, offset: u64, size: u64) -> RawEntry {
        RawEntry {
            n: name.to_string(),
            o: offset,
            s: size,
            m: "application/octet-stream".to_string(),
            a: AttributeMap::new(),
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = validate_raw_entries(vec![raw("a", 64, 1), raw("a", 65, 1)], 66).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn rejects_overlapping_ranges() {
        let err = validate_raw_entries(vec![raw("a", 64, 4), raw("b", 66, 4)], 70).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn allows_two_zero_length_entries_at_the_same_offset() {
        let entries = validate_raw_entries(vec![raw("a", 64, 0), raw("b", 64, 0)], 64).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn allows_a_zero_length_entry_sharing_a_start_with_a_nonzero_entry() {
        // "a" occupies [64, 68); "b" is zero-length and starts exactly where
        // "a" starts. A zero-length range can never truly overlap anything,
        // regardless of which entry the decoder happens to see first.
        let entries = validate_raw_entries(vec![raw("a", 64, 4), raw("b", 64, 0)], 68).unwrap();
        assert_eq!(entries.len(), 2);

        let entries = validate_raw_entries(vec![raw("b", 64, 0), raw("a", 64, 4)], 68).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn rejects_offset_before_content_region() {
        let err = validate_raw_entries(vec![raw("a", 0, 4)], 70).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn rejects_range_past_metadata_offset() {
        let err = validate_raw_entries(vec![raw("a", 64, 100)], 70).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }

    #[test]
    fn rejects_attribute_nesting_deeper_than_three() {
        // entry.a (depth 1) -> m2 (depth 2) -> m3 (depth 3) -> m4 (depth 4, too deep).
        let mut m4 = AttributeMap::new();
        m4.insert("x".into(), AttributeValue::Bool(true));
        let mut m3 = AttributeMap::new();
        m3.insert("l4".into(), AttributeValue::Map(m4));
        let mut m2 = AttributeMap::new();
        m2.insert("l3".into(), AttributeValue::Map(m3));
        let mut entry_a = AttributeMap::new();
        entry_a.insert("l2".into(), AttributeValue::Map(m2));

        let mut entry = raw("a", 64, 1);
        entry.a = entry_a;

        let err = validate_raw_entries(vec![entry], 70).unwrap_err();
        assert!(matches!(err, Error::Range { .. }));
    }
}
