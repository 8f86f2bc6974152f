//! Ledger store
//!
//! Key → bytes storage with per-key versions. This is the boundary to the
//! host's state database: the engine only ever calls `get` and `put`.
//!
//! # Consistency
//!
//! - Read-your-writes within one owner
//! - Every put bumps the key's version by one (first put is version 1)
//! - A put may carry a precondition; a failed precondition is a conflict,
//!   never a silent overwrite
//! - No deletes: absence is the only "deleted" state

mod entry;
mod errors;
mod file;
mod memory;

use std::fmt;

pub use entry::LedgerEntry;
pub use errors::{StoreError, StoreResult};
pub use file::{FileLedger, LEDGER_DIR, LEDGER_FILE};
pub use memory::MemoryLedger;

/// Monotonic per-key version.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Version(u64);

impl Version {
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Version assigned to the put that follows `current`.
    pub fn after(current: Option<Version>) -> Version {
        match current {
            Some(v) => Version(v.0 + 1),
            None => Version(1),
        }
    }
}

/// Condition a put requires of the key's current state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Precondition {
    /// Unconditional overwrite
    Any,
    /// Key must not hold a value yet
    Absent,
    /// Key must currently be at exactly this version
    Version(Version),
}

impl Precondition {
    pub fn holds(&self, current: Option<Version>) -> bool {
        match self {
            Precondition::Any => true,
            Precondition::Absent => current.is_none(),
            Precondition::Version(v) => current == Some(*v),
        }
    }

    /// Fails with a conflict when the precondition does not hold.
    pub fn check(&self, key: &str, current: Option<Version>) -> StoreResult<()> {
        if self.holds(current) {
            Ok(())
        } else {
            Err(StoreError::Conflict {
                key: key.to_string(),
                expected: *self,
                actual: current,
            })
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::Any => write!(f, "any version"),
            Precondition::Absent => write!(f, "no value"),
            Precondition::Version(v) => write!(f, "version {}", v.value()),
        }
    }
}

/// A stored value together with the version that wrote it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned {
    pub value: Vec<u8>,
    pub version: Version,
}

/// Key-value ledger with optimistic versioning.
pub trait LedgerStore {
    /// Returns the latest value for `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>>;

    /// Stores `value` under `key` if `precondition` holds and returns the new
    /// version. Nothing is stored when an error is returned.
    fn put(&mut self, key: &str, value: Vec<u8>, precondition: Precondition)
        -> StoreResult<Version>;

    /// Convenience existence check.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for &mut S {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        (**self).get(key)
    }

    fn put(
        &mut self,
        key: &str,
        value: Vec<u8>,
        precondition: Precondition,
    ) -> StoreResult<Version> {
        (**self).put(key, value, precondition)
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Versioned>> {
        (**self).get(key)
    }

    fn put(
        &mut self,
        key: &str,
        value: Vec<u8>,
        precondition: Precondition,
    ) -> StoreResult<Version> {
        (**self).put(key, value, precondition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_after() {
        assert_eq!(Version::after(None), Version::new(1));
        assert_eq!(Version::after(Some(Version::new(4))), Version::new(5));
    }

    #[test]
    fn test_precondition_holds() {
        let v1 = Some(Version::new(1));
        assert!(Precondition::Any.holds(None));
        assert!(Precondition::Any.holds(v1));
        assert!(Precondition::Absent.holds(None));
        assert!(!Precondition::Absent.holds(v1));
        assert!(Precondition::Version(Version::new(1)).holds(v1));
        assert!(!Precondition::Version(Version::new(1)).holds(None));
        assert!(!Precondition::Version(Version::new(2)).holds(v1));
    }

    #[test]
    fn test_precondition_check_reports_actual() {
        let err = Precondition::Version(Version::new(1))
            .check("wallet:W1", Some(Version::new(3)))
            .unwrap_err();
        match err {
            StoreError::Conflict { key, actual, .. } => {
                assert_eq!(key, "wallet:W1");
                assert_eq!(actual, Some(Version::new(3)));
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }
}
