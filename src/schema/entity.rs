//! Entity kinds
//!
//! Each kind owns one key namespace in the ledger, named by its collection.

use std::fmt;
use std::str::FromStr;

use super::catalog;
use super::types::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Bank,
    Business,
    Program,
    Instrument,
    Loan,
    LoanBalance,
    Transaction,
    TxnBalance,
    Wallet,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Bank,
        EntityKind::Business,
        EntityKind::Program,
        EntityKind::Instrument,
        EntityKind::Loan,
        EntityKind::LoanBalance,
        EntityKind::Transaction,
        EntityKind::TxnBalance,
        EntityKind::Wallet,
    ];

    /// Collection name; also the contract name callers address.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Bank => "bank",
            EntityKind::Business => "business",
            EntityKind::Program => "program",
            EntityKind::Instrument => "instrument",
            EntityKind::Loan => "loan",
            EntityKind::LoanBalance => "loan-balance",
            EntityKind::Transaction => "transaction",
            EntityKind::TxnBalance => "txn-balance",
            EntityKind::Wallet => "wallet",
        }
    }

    pub fn from_collection(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.collection() == name)
    }

    pub fn schema(&self) -> &'static Schema {
        match self {
            EntityKind::Bank => &catalog::BANK,
            EntityKind::Business => &catalog::BUSINESS,
            EntityKind::Program => &catalog::PROGRAM,
            EntityKind::Instrument => &catalog::INSTRUMENT,
            EntityKind::Loan => &catalog::LOAN,
            EntityKind::LoanBalance => &catalog::LOAN_BALANCE,
            EntityKind::Transaction => &catalog::TRANSACTION,
            EntityKind::TxnBalance => &catalog::TXN_BALANCE,
            EntityKind::Wallet => &catalog::WALLET,
        }
    }

    /// Ledger key under which a record of this kind is stored.
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}:{}", self.collection(), key)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_collection(s).ok_or_else(|| format!("unknown entity kind '{}'", s))
    }
}
