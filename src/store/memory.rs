//! In-memory ledger
//!
//! Holds the latest value per key. Used by tests and by hosts that persist
//! state elsewhere.

use std::collections::HashMap;

use super::errors::StoreResult;
use super::{LedgerStore, Precondition, Version, Versioned};

#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: HashMap<String, Versioned>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys holding a value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces raw bytes without versioning rules. For tests that need to
    /// plant foreign or damaged values.
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Vec<u8>) {
        let key = key.into();
        let version = Version::after(self.entries.get(&key).map(|e| e.version));
        self.entries.insert(key, Versioned { value, version });
    }
}

impl LedgerStore for MemoryLedger {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(
        &mut self,
        key: &str,
        value: Vec<u8>,
        precondition: Precondition,
    ) -> StoreResult<Version> {
        let current = self.entries.get(key).map(|e| e.version);
        precondition.check(key, current)?;

        let version = Version::after(current);
        self.entries
            .insert(key.to_string(), Versioned { value, version });
        Ok(version)
    }
}
