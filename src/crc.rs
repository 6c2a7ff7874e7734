//! CRC-32/IEEE (802.3, reflected, init 0xFFFFFFFF, final XOR 0xFFFFFFFF).
//!
//! The checksum in the MFAF trailer covers only the metadata region —
//! never the header, content, or trailer itself.

use crc32fast::Hasher;

/// CRC-32/IEEE of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    let mut h = Hasher::new();
    h.update(data);
    h.finalize()
}
