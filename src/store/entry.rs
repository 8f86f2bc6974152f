//! Ledger file entry format
//!
//! ```text
//! +------------------+
//! | Entry Length     | (u32 LE)
//! +------------------+
//! | Storage Key      | (length-prefixed string)
//! +------------------+
//! | Version          | (u64 LE)
//! +------------------+
//! | Value            | (length-prefixed bytes)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

use super::Version;
use crate::checksum::compute_checksum;

/// length + empty key + version + empty value + checksum
pub(crate) const MIN_ENTRY_SIZE: usize = 4 + 4 + 8 + 4 + 4;

/// One put, as appended to the ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub key: String,
    pub version: Version,
    pub value: Vec<u8>,
}

impl LedgerEntry {
    pub fn new(key: impl Into<String>, version: Version, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            version,
            value,
        }
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.key.len() + 8 + 4 + self.value.len());

        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.key.as_bytes());

        buf.extend_from_slice(&self.version.value().to_le_bytes());

        buf.extend_from_slice(&(self.value.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.value);

        buf
    }

    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let entry_length = (4 + body.len() + 4) as u32;

        let mut entry = Vec::with_capacity(entry_length as usize);
        entry.extend_from_slice(&entry_length.to_le_bytes());
        entry.extend_from_slice(&body);

        let checksum = compute_checksum(&entry);
        entry.extend_from_slice(&checksum.to_le_bytes());

        entry
    }

    /// Parses one entry from the front of `data`, verifying its checksum.
    ///
    /// Returns the entry and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_ENTRY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Entry too short",
            ));
        }

        let entry_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if entry_length < MIN_ENTRY_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid entry length: {}", entry_length),
            ));
        }

        if data.len() < entry_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Entry truncated: expected {} bytes, got {}",
                    entry_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = entry_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        let key = {
            let bytes = read_bytes(&mut cursor)?;
            String::from_utf8(bytes).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
            })?
        };

        let mut version_buf = [0u8; 8];
        cursor.read_exact(&mut version_buf)?;
        let version = Version::new(u64::from_le_bytes(version_buf));

        let value = read_bytes(&mut cursor)?;

        if cursor.position() as usize != checksum_offset - 4 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Entry length does not match its contents",
            ));
        }

        Ok((Self { key, version, value }, entry_length))
    }
}

fn read_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;

    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
