//! tradeledger - validated persistence for trade-finance entities
//!
//! Banks, businesses, programs, instruments, loans, balances, transactions
//! and wallets are written as positional string arguments, validated against
//! a fixed schema per kind, encoded canonically and stored under namespaced
//! keys in a versioned key-value ledger.

pub mod checksum;
pub mod cli;
pub mod dispatch;
pub mod logging;
pub mod record;
pub mod schema;
pub mod service;
pub mod store;
