//! Entity schemas and field validators
//!
//! Schemas are immutable, declared once, and are the only place that knows
//! how each entity kind's fields are parsed.
//!
//! # Design Principles
//!
//! - Exact argument counts, checked first
//! - Fail-fast, in schema field order
//! - No coercion between date patterns
//! - No status transition rules: any member of a vocabulary may follow any other
//! - Deterministic validation

pub mod catalog;
mod dates;
mod entity;
mod errors;
mod types;
mod validator;
mod vocabulary;

pub use catalog::REPAYMENT_ACCOUNTS;
pub use dates::DatePattern;
pub use entity::EntityKind;
pub use errors::{FieldError, FieldResult, Severity};
pub use types::{FieldDef, FieldRule, FieldSource, FieldType, Schema};
pub use validator::{
    check_arity, parse_choice, parse_date, parse_decimal, parse_integer, parse_text_list,
    validate_field, SchemaValidator,
};
pub use vocabulary::{
    Vocabulary, LEDGER_TXN_TYPE, LIFECYCLE_STATUS, LOAN_BALANCE_TXN_TYPE, PROGRAM_EXPOSURE,
    PROGRAM_TYPE, TRANSACTION_TYPE,
};
