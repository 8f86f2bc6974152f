//! Append-only file ledger
//!
//! Every put appends one entry to `<data_dir>/ledger/state.dat` and fsyncs
//! before returning. Nothing is updated in place; for each key the latest
//! entry in file order wins.
//!
//! On open the whole file is scanned to rebuild the key → offset index.
//! Any checksum failure or truncated tail is fatal: the ledger refuses to
//! open rather than serve partial state.
//!
//! A put that fails while writing or syncing truncates the file back to the
//! last acknowledged offset. If that truncation fails too, the ledger is
//! poisoned and refuses every further put.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use super::entry::{LedgerEntry, MIN_ENTRY_SIZE};
use super::errors::{StoreError, StoreResult};
use super::{LedgerStore, Precondition, Version, Versioned};

/// Ledger subdirectory under the data directory
pub const LEDGER_DIR: &str = "ledger";

/// Ledger file name
pub const LEDGER_FILE: &str = "state.dat";

#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: u64,
    version: Version,
}

pub struct FileLedger {
    path: PathBuf,
    /// Append handle
    file: File,
    /// Separate read handle for point lookups
    reader: File,
    current_offset: u64,
    index: HashMap<String, Slot>,
    /// Set when a torn tail could not be rolled back
    poisoned: bool,
}

impl FileLedger {
    /// Opens or creates the ledger under `data_dir`.
    ///
    /// # Errors
    ///
    /// - `TL_STORAGE_IO` if the directory or file cannot be created
    /// - `TL_DATA_CORRUPTION` if any existing entry fails verification
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let ledger_dir = data_dir.join(LEDGER_DIR);
        let path = ledger_dir.join(LEDGER_FILE);

        if !ledger_dir.exists() {
            fs::create_dir_all(&ledger_dir).map_err(|e| {
                StoreError::io(
                    format!("Failed to create ledger directory: {}", ledger_dir.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                StoreError::io(format!("Failed to open ledger file: {}", path.display()), e)
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StoreError::io("Failed to read ledger metadata", e))?
            .len();

        let reader = File::open(&path).map_err(|e| {
            StoreError::io(format!("Failed to open ledger file: {}", path.display()), e)
        })?;

        let index = Self::build_index(&path, current_offset)?;

        info!(
            path = %path.display(),
            keys = index.len(),
            bytes = current_offset,
            "ledger opened"
        );

        Ok(Self {
            path,
            file,
            reader,
            current_offset,
            index,
            poisoned: false,
        })
    }

    /// Scans every entry in file order. Later entries replace earlier ones.
    fn build_index(path: &Path, file_size: u64) -> StoreResult<HashMap<String, Slot>> {
        let mut index = HashMap::new();
        if file_size == 0 {
            return Ok(index);
        }

        let file = File::open(path)
            .map_err(|e| StoreError::io(format!("Failed to open {}", path.display()), e))?;
        let mut reader = BufReader::new(file);
        let mut offset = 0u64;

        while offset < file_size {
            let (entry, length) = read_entry(&mut reader, offset, file_size - offset)?;
            index.insert(
                entry.key,
                Slot {
                    offset,
                    version: entry.version,
                },
            );
            offset += length;
        }

        Ok(index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct keys holding a value.
    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Appends `bytes` and fsyncs. On failure the tail is rolled back so the
    /// file ends at `current_offset` again.
    fn append_synced(&mut self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let written = self
            .file
            .write_all(bytes)
            .map_err(|e| StoreError::io(format!("Failed to append entry for {}", key), e))
            .and_then(|()| {
                self.file
                    .sync_all()
                    .map_err(|e| StoreError::io(format!("fsync failed after writing {}", key), e))
            });

        if let Err(err) = written {
            self.discard_tail();
            return Err(err);
        }
        Ok(())
    }

    /// Truncates anything past the last acknowledged entry.
    fn discard_tail(&mut self) {
        let offset = self.current_offset;
        let truncated = self
            .file
            .set_len(offset)
            .and_then(|()| self.file.sync_all());

        match truncated {
            Ok(()) => info!(offset, "ledger tail rolled back"),
            Err(e) => {
                error!(offset, error = %e, "ledger tail rollback failed; refusing further writes");
                self.poisoned = true;
            }
        }
    }

    fn read_at(&self, slot: Slot) -> StoreResult<LedgerEntry> {
        let mut handle = &self.reader;
        handle.seek(SeekFrom::Start(slot.offset)).map_err(|e| {
            StoreError::io(format!("Failed to seek to offset {}", slot.offset), e)
        })?;
        let (entry, _) = read_entry(
            &mut handle,
            slot.offset,
            self.current_offset - slot.offset,
        )?;
        Ok(entry)
    }
}

/// Reads and verifies the entry starting at `offset`.
fn read_entry<R: Read>(
    reader: &mut R,
    offset: u64,
    remaining: u64,
) -> StoreResult<(LedgerEntry, u64)> {
    if remaining < MIN_ENTRY_SIZE as u64 {
        return Err(StoreError::corruption(
            offset,
            format!(
                "Truncated ledger: {} bytes remaining, minimum entry size is {}",
                remaining, MIN_ENTRY_SIZE
            ),
        ));
    }

    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).map_err(|e| {
        StoreError::corruption(offset, format!("Failed to read entry length: {}", e))
    })?;
    let entry_length = u32::from_le_bytes(len_buf) as u64;

    if entry_length < MIN_ENTRY_SIZE as u64 {
        return Err(StoreError::corruption(
            offset,
            format!("Invalid entry length: {}", entry_length),
        ));
    }
    if entry_length > remaining {
        return Err(StoreError::corruption(
            offset,
            format!(
                "Entry length {} exceeds remaining file size {}",
                entry_length, remaining
            ),
        ));
    }

    let mut buf = vec![0u8; entry_length as usize];
    buf[..4].copy_from_slice(&len_buf);
    reader.read_exact(&mut buf[4..]).map_err(|e| {
        StoreError::corruption(offset, format!("Failed to read entry body: {}", e))
    })?;

    let (entry, consumed) =
        LedgerEntry::deserialize(&buf).map_err(|e| StoreError::corruption(offset, e.to_string()))?;
    Ok((entry, consumed as u64))
}

impl LedgerStore for FileLedger {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        let slot = match self.index.get(key) {
            Some(slot) => *slot,
            None => return Ok(None),
        };

        let entry = self.read_at(slot)?;
        if entry.key != key {
            return Err(StoreError::corruption(
                slot.offset,
                format!("Index points at '{}' while looking up '{}'", entry.key, key),
            ));
        }

        Ok(Some(Versioned {
            value: entry.value,
            version: entry.version,
        }))
    }

    fn put(
        &mut self,
        key: &str,
        value: Vec<u8>,
        precondition: Precondition,
    ) -> StoreResult<Version> {
        if self.poisoned {
            return Err(StoreError::Poisoned {
                path: self.path.display().to_string(),
                offset: self.current_offset,
            });
        }

        let current = self.index.get(key).map(|slot| slot.version);
        precondition.check(key, current)?;

        let version = Version::after(current);
        let entry = LedgerEntry::new(key, version, value);
        let bytes = entry.serialize();
        let offset = self.current_offset;

        self.append_synced(key, &bytes)?;

        self.current_offset += bytes.len() as u64;
        self.index.insert(entry.key, Slot { offset, version });

        debug!(key, version = version.value(), offset, "ledger put");

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_file() {
        let temp = TempDir::new().unwrap();
        let ledger = FileLedger::open(temp.path()).unwrap();
        assert!(ledger.path().exists());
        assert_eq!(ledger.key_count(), 0);
        assert_eq!(ledger.current_offset(), 0);
    }

    #[test]
    fn test_put_then_get() {
        let temp = TempDir::new().unwrap();
        let mut ledger = FileLedger::open(temp.path()).unwrap();

        let v1 = ledger.put("bank:B1", b"one".to_vec(), Precondition::Any).unwrap();
        let v2 = ledger.put("bank:B1", b"two".to_vec(), Precondition::Any).unwrap();
        ledger.put("bank:B2", b"other".to_vec(), Precondition::Any).unwrap();

        assert_eq!(v1, Version::new(1));
        assert_eq!(v2, Version::new(2));

        let got = ledger.get("bank:B1").unwrap().unwrap();
        assert_eq!(got.value, b"two");
        assert_eq!(got.version, v2);
        assert_eq!(ledger.key_count(), 2);
        assert!(ledger.get("bank:B3").unwrap().is_none());
    }

    #[test]
    fn test_reopen_rebuilds_index() {
        let temp = TempDir::new().unwrap();
        {
            let mut ledger = FileLedger::open(temp.path()).unwrap();
            ledger.put("wallet:W1", b"a".to_vec(), Precondition::Any).unwrap();
            ledger.put("wallet:W1", b"b".to_vec(), Precondition::Any).unwrap();
        }

        let mut ledger = FileLedger::open(temp.path()).unwrap();
        let got = ledger.get("wallet:W1").unwrap().unwrap();
        assert_eq!(got.value, b"b");
        assert_eq!(got.version, Version::new(2));

        // Versions continue after reopen.
        let v3 = ledger
            .put("wallet:W1", b"c".to_vec(), Precondition::Version(Version::new(2)))
            .unwrap();
        assert_eq!(v3, Version::new(3));
    }

    #[test]
    fn test_conflict_appends_nothing() {
        let temp = TempDir::new().unwrap();
        let mut ledger = FileLedger::open(temp.path()).unwrap();
        ledger.put("k", b"a".to_vec(), Precondition::Any).unwrap();
        let before = ledger.current_offset();

        let err = ledger
            .put("k", b"b".to_vec(), Precondition::Absent)
            .unwrap_err();
        assert_eq!(err.code(), "TL_CONFLICT");
        assert_eq!(ledger.current_offset(), before);
    }

    #[test]
    fn test_torn_tail_is_discarded() {
        let temp = TempDir::new().unwrap();
        let mut ledger = FileLedger::open(temp.path()).unwrap();
        ledger.put("wallet:W1", b"a".to_vec(), Precondition::Any).unwrap();
        let good = ledger.current_offset();

        // Half an entry lands on disk before the write fails.
        let torn = LedgerEntry::new("wallet:W2", Version::new(1), b"lost".to_vec()).serialize();
        ledger.file.write_all(&torn[..torn.len() / 2]).unwrap();
        ledger.discard_tail();

        assert!(!ledger.is_poisoned());
        assert_eq!(fs::metadata(ledger.path()).unwrap().len(), good);

        ledger.put("wallet:W3", b"c".to_vec(), Precondition::Any).unwrap();
        assert_eq!(ledger.get("wallet:W3").unwrap().unwrap().value, b"c");
        assert!(ledger.get("wallet:W2").unwrap().is_none());
        drop(ledger);

        let reopened = FileLedger::open(temp.path()).unwrap();
        assert_eq!(reopened.key_count(), 2);
        assert_eq!(reopened.get("wallet:W1").unwrap().unwrap().value, b"a");
    }

    #[test]
    fn test_failed_append_without_rollback_poisons() {
        let temp = TempDir::new().unwrap();
        let mut ledger = FileLedger::open(temp.path()).unwrap();
        ledger.put("wallet:W1", b"a".to_vec(), Precondition::Any).unwrap();
        let good = ledger.current_offset();

        // A read-only handle fails both the append and the truncation.
        ledger.file = File::open(ledger.path()).unwrap();

        let err = ledger
            .put("wallet:W2", b"b".to_vec(), Precondition::Any)
            .unwrap_err();
        assert_eq!(err.code(), "TL_STORAGE_IO");
        assert!(ledger.is_poisoned());
        assert_eq!(ledger.current_offset(), good);
        assert!(ledger.get("wallet:W2").unwrap().is_none());

        let err = ledger
            .put("wallet:W3", b"c".to_vec(), Precondition::Any)
            .unwrap_err();
        assert!(matches!(err, StoreError::Poisoned { .. }));

        // Acknowledged state stays readable.
        assert_eq!(ledger.get("wallet:W1").unwrap().unwrap().value, b"a");
    }

    #[test]
    fn test_corruption_refuses_open() {
        let temp = TempDir::new().unwrap();
        let path = {
            let mut ledger = FileLedger::open(temp.path()).unwrap();
            ledger.put("k", b"payload".to_vec(), Precondition::Any).unwrap();
            ledger.path().to_path_buf()
        };

        let mut bytes = fs::read(&path).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        fs::write(&path, &bytes).unwrap();

        let err = FileLedger::open(temp.path()).err().unwrap();
        assert_eq!(err.code(), "TL_DATA_CORRUPTION");
    }

    #[test]
    fn test_truncated_tail_refuses_open() {
        let temp = TempDir::new().unwrap();
        let path = {
            let mut ledger = FileLedger::open(temp.path()).unwrap();
            ledger.put("k", b"payload".to_vec(), Precondition::Any).unwrap();
            ledger.path().to_path_buf()
        };

        let bytes = fs::read(&path).unwrap();
        fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        let err = FileLedger::open(temp.path()).err().unwrap();
        assert_eq!(err.code(), "TL_DATA_CORRUPTION");
    }
}
