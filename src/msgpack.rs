//! MessagePack wire adapter for the metadata region.
//!
//! The metadata root is an array of maps with five short string keys. This
//! module owns only the wire (de)serialization; depth/key-length/type
//! validation beyond what `serde` gives us for free lives in
//! [`crate::metadata`]. Unknown keys are ignored by construction — we never
//! set `#[serde(deny_unknown_fields)]`, which is exactly what forward
//! compatibility with producers that add new keys requires.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum nesting depth for an entry's `attributes` map (root map = depth 1).
pub const MAX_ATTRIBUTE_DEPTH: usize = 3;

/// Maximum byte length of an attribute key, as UTF-8.
pub const MAX_ATTRIBUTE_KEY_LEN: usize = 256;

pub type AttributeMap = HashMap<String, AttributeValue>;

/// The tagged sum over scalar-or-nested-map attribute values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Map(AttributeMap),
    Null,
}

/// Wire shape of one entry in the metadata array. Field names are
/// one-byte keys; `m` and `a` default on decode when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntry {
    pub n: String,
    pub o: u64,
    pub s: u64,
    #[serde(default = "default_mime")]
    pub m: String,
    #[serde(default)]
    pub a: AttributeMap,
}

fn default_mime() -> String {
    "application/octet-stream".to_string()
}

/// Encode the metadata array. The canonical encoder always emits all five
/// keys per entry — `to_vec_named` serializes struct fields as a map keyed
/// by their (renamed) field names rather than a plain array.
pub fn encode(entries: &[RawEntry]) -> Result<Vec<u8>> {
    rmp_serde::encode::to_vec_named(entries).map_err(Error::from)
}

/// Decode the metadata array. Unknown keys inside each map, and unknown
/// keys inside nested `a` maps, are silently ignored by `serde`'s default
/// behavior.
pub fn decode(bytes: &[u8]) -> Result<Vec<RawEntry>> {
    rmp_serde::from_slice(bytes).map_err(Error::from)
}
