//! CRC32 checksum computation
//!
//! Used by the record codec and by ledger file entries. Any checksum failure
//! on read aborts the read.
//!
//! Uses CRC32 (IEEE polynomial).

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}
