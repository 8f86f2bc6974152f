//! Entity service
//!
//! Write path: validate → resolve references → encode → one put.
//! Read path: one get → decode.
//! Append path: get → decode → extend list → encode → put at the read version.
//!
//! A failing step leaves the ledger untouched. Nothing is retried here:
//! conflicts go back to the caller.

use tracing::{debug, error, info, warn};

use super::errors::{ServiceError, ServiceResult};
use super::resolver::{ReferenceMode, ReferenceResolver};
use crate::record::{decode, encode, DecodeError, Record};
use crate::schema::{parse_text_list, EntityKind, SchemaValidator, REPAYMENT_ACCOUNTS};
use crate::store::{LedgerStore, Precondition, StoreError, Version};

pub struct EntityService<S: LedgerStore> {
    store: S,
    resolver: ReferenceResolver,
}

impl<S: LedgerStore> EntityService<S> {
    pub fn new(store: S, mode: ReferenceMode) -> Self {
        Self {
            store,
            resolver: ReferenceResolver::new(mode),
        }
    }

    pub fn reference_mode(&self) -> ReferenceMode {
        self.resolver.mode()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Validates `args` (the write arguments after the key) and replaces
    /// whatever is stored under `key`.
    ///
    /// # Errors
    ///
    /// - `TL_ARGUMENT_COUNT`, `TL_FIELD_PARSE`, `TL_ENUM_VALIDATION`
    /// - `TL_REFERENCE_NOT_FOUND` in strict mode
    /// - store errors from the put
    pub fn write(&mut self, kind: EntityKind, key: &str, args: &[String]) -> ServiceResult<Version> {
        let record = SchemaValidator::new(kind.schema()).validate_write(args)?;
        self.resolver.check(&record, &self.store)?;

        let storage_key = kind.storage_key(key);
        let version = self
            .store
            .put(&storage_key, encode(&record), Precondition::Any)
            .map_err(|e| log_store_failure(&storage_key, e))?;

        info!(collection = %kind, key, version = version.value(), "record written");
        Ok(version)
    }

    /// Returns the record stored under `key`.
    pub fn read(&self, kind: EntityKind, key: &str) -> ServiceResult<Record> {
        self.read_versioned(kind, key).map(|(record, _)| record)
    }

    /// Like `read`, also returning the version the record was read at.
    pub fn read_versioned(&self, kind: EntityKind, key: &str) -> ServiceResult<(Record, Version)> {
        let storage_key = kind.storage_key(key);
        let stored = self
            .store
            .get(&storage_key)
            .map_err(|e| log_store_failure(&storage_key, e))?
            .ok_or_else(|| ServiceError::not_found(kind, key))?;

        let record = decode(kind, &stored.value).map_err(|source| {
            warn!(collection = %kind, key, error = %source, "stored record failed to decode");
            ServiceError::Decode {
                kind,
                key: key.to_string(),
                source,
            }
        })?;

        debug!(collection = %kind, key, version = stored.version.value(), "record read");
        Ok((record, stored.version))
    }

    /// Appends comma-separated accounts to a program's repayment accounts.
    ///
    /// The put is conditional on the version that was read, so a concurrent
    /// writer in between surfaces as a retryable `TL_CONFLICT`.
    pub fn append_repayment_accounts(&mut self, key: &str, accounts: &str) -> ServiceResult<Version> {
        let kind = EntityKind::Program;
        let (mut record, read_version) = self.read_versioned(kind, key)?;
        let additions = parse_text_list(REPAYMENT_ACCOUNTS, accounts)?;

        match record.list_mut(REPAYMENT_ACCOUNTS) {
            Some(list) => list.extend(additions),
            None => {
                // Only reachable if the program schema loses its list field.
                return Err(ServiceError::Decode {
                    kind,
                    key: key.to_string(),
                    source: DecodeError::FieldCount {
                        expected: kind.schema().fields.len(),
                        found: record.values().len(),
                    },
                });
            }
        }

        let storage_key = kind.storage_key(key);
        let version = self
            .store
            .put(
                &storage_key,
                encode(&record),
                Precondition::Version(read_version),
            )
            .map_err(|e| log_store_failure(&storage_key, e))?;

        info!(
            collection = %kind,
            key,
            version = version.value(),
            accounts = record.list(REPAYMENT_ACCOUNTS).map_or(0, <[String]>::len),
            "repayment accounts appended"
        );
        Ok(version)
    }
}

fn log_store_failure(storage_key: &str, err: StoreError) -> ServiceError {
    if err.is_retryable() {
        warn!(key = storage_key, code = err.code(), error = %err, "write conflict");
    } else {
        error!(key = storage_key, code = err.code(), error = %err, "ledger store failure");
    }
    ServiceError::Store(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedger;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn service() -> EntityService<MemoryLedger> {
        EntityService::new(MemoryLedger::new(), ReferenceMode::Permissive)
    }

    fn program_args() -> Vec<String> {
        args(&[
            "SupplyFin", "AcmeCo", "ar", "01/01/2024", "31/12/2024", "100000", "8.5", "buyer",
            "2.0", "30", "AuthA", "01/01/2024",
        ])
    }

    #[test]
    fn test_wallet_overwrite() {
        let mut svc = service();
        svc.write(EntityKind::Wallet, "W1", &args(&["1000"])).unwrap();
        svc.write(EntityKind::Wallet, "W1", &args(&["500"])).unwrap();
        let record = svc.read(EntityKind::Wallet, "W1").unwrap();
        assert_eq!(record.integer("balance"), Some(500));
    }

    #[test]
    fn test_missing_key_is_not_found() {
        let svc = service();
        let err = svc.read(EntityKind::Wallet, "W-404").unwrap_err();
        assert_eq!(err.code(), "TL_NOT_FOUND");
    }

    #[test]
    fn test_rejected_write_leaves_ledger_untouched() {
        let mut svc = service();
        let err = svc
            .write(EntityKind::Wallet, "W1", &args(&["ten"]))
            .unwrap_err();
        assert_eq!(err.code(), "TL_FIELD_PARSE");
        assert!(svc.store().is_empty());
    }

    #[test]
    fn test_namespaces_are_disjoint() {
        let mut svc = service();
        svc.write(EntityKind::Wallet, "X1", &args(&["10"])).unwrap();
        let err = svc.read(EntityKind::Bank, "X1").unwrap_err();
        assert_eq!(err.code(), "TL_NOT_FOUND");
    }

    #[test]
    fn test_append_accumulates_in_order() {
        let mut svc = service();
        svc.write(EntityKind::Program, "P1", &program_args()).unwrap();
        svc.append_repayment_accounts("P1", "A,B").unwrap();
        svc.append_repayment_accounts("P1", "C").unwrap();

        let record = svc.read(EntityKind::Program, "P1").unwrap();
        assert_eq!(
            record.list(REPAYMENT_ACCOUNTS),
            Some(&["A".to_string(), "B".to_string(), "C".to_string()][..])
        );
    }

    #[test]
    fn test_rewrite_resets_accounts() {
        let mut svc = service();
        svc.write(EntityKind::Program, "P1", &program_args()).unwrap();
        svc.append_repayment_accounts("P1", "A").unwrap();
        svc.write(EntityKind::Program, "P1", &program_args()).unwrap();

        let record = svc.read(EntityKind::Program, "P1").unwrap();
        assert_eq!(record.list(REPAYMENT_ACCOUNTS), Some(&[][..]));
    }

    #[test]
    fn test_append_to_missing_program() {
        let mut svc = service();
        let err = svc.append_repayment_accounts("P-none", "A").unwrap_err();
        assert_eq!(err.code(), "TL_NOT_FOUND");
    }

    #[test]
    fn test_append_empty_list_is_parse_error() {
        let mut svc = service();
        svc.write(EntityKind::Program, "P1", &program_args()).unwrap();
        let err = svc.append_repayment_accounts("P1", " , ").unwrap_err();
        assert_eq!(err.code(), "TL_FIELD_PARSE");
    }

    #[test]
    fn test_undecodable_bytes() {
        let mut svc = service();
        svc.store_mut().insert_raw("wallet:W1", vec![0xde, 0xad, 0xbe, 0xef]);
        let err = svc.read(EntityKind::Wallet, "W1").unwrap_err();
        assert_eq!(err.code(), "TL_DECODE");
    }
}
