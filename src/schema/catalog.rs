//! Entity schema declarations
//!
//! Field order below is the positional argument order of each write
//! operation (after the key) and the persisted field order.

use super::dates::DatePattern;
use super::entity::EntityKind;
use super::types::{FieldDef, Schema};
use super::vocabulary::{
    LEDGER_TXN_TYPE, LIFECYCLE_STATUS, LOAN_BALANCE_TXN_TYPE, PROGRAM_EXPOSURE, PROGRAM_TYPE,
    TRANSACTION_TYPE,
};

pub static BANK: Schema = Schema {
    kind: EntityKind::Bank,
    write_op: "writeBankInfo",
    read_op: "getBankInfo",
    fields: &[
        FieldDef::text("name"),
        FieldDef::text("branch"),
        FieldDef::text("code"),
        FieldDef::text("wallet_id").references(EntityKind::Wallet),
        FieldDef::text("asset_wallet_id").references(EntityKind::Wallet),
        FieldDef::text("charges_wallet_id").references(EntityKind::Wallet),
        FieldDef::text("liability_wallet_id").references(EntityKind::Wallet),
        FieldDef::text("tds_receivable_wallet_id").references(EntityKind::Wallet),
    ],
};

pub static BUSINESS: Schema = Schema {
    kind: EntityKind::Business,
    write_op: "putNewBusinessInfo",
    read_op: "getBusinessInfo",
    fields: &[
        FieldDef::text("name"),
        FieldDef::text("account_no"),
        FieldDef::integer("credit_limit"),
        FieldDef::text("wallet_id").references(EntityKind::Wallet),
        FieldDef::text("loan_wallet_id").references(EntityKind::Wallet),
        FieldDef::text("liability_wallet_id").references(EntityKind::Wallet),
        FieldDef::decimal("max_roi"),
        FieldDef::decimal("min_roi"),
        FieldDef::integer("program_count"),
        FieldDef::text("exposure"),
    ],
};

pub static PROGRAM: Schema = Schema {
    kind: EntityKind::Program,
    write_op: "writeProgram",
    read_op: "getProgram",
    fields: &[
        FieldDef::text("name"),
        FieldDef::text("anchor").references(EntityKind::Business),
        FieldDef::choice("program_type", &PROGRAM_TYPE),
        FieldDef::date("start_date", DatePattern::DayMonthYear),
        FieldDef::date("end_date", DatePattern::DayMonthYear),
        FieldDef::integer("limit"),
        FieldDef::decimal("roi"),
        FieldDef::choice("exposure", &PROGRAM_EXPOSURE),
        FieldDef::decimal("discount_percentage"),
        FieldDef::integer("discount_period"),
        FieldDef::text("sanction_authority"),
        FieldDef::date("sanction_date", DatePattern::DayMonthYear),
        FieldDef::derived_list(REPAYMENT_ACCOUNTS),
    ],
};

/// The one list field that is appended to rather than replaced.
pub const REPAYMENT_ACCOUNTS: &str = "repayment_accounts";

pub static INSTRUMENT: Schema = Schema {
    kind: EntityKind::Instrument,
    write_op: "enterInstrument",
    read_op: "getInstrument",
    fields: &[
        FieldDef::text("ref_no"),
        FieldDef::date("instrument_date", DatePattern::DayMonthYear),
        FieldDef::text("seller_business_id").references(EntityKind::Business),
        FieldDef::text("buyer_business_id").references(EntityKind::Business),
        FieldDef::integer("amount"),
        FieldDef::choice("status", &LIFECYCLE_STATUS),
        FieldDef::date("due_date", DatePattern::DayMonthYear),
        FieldDef::text("program_id").references(EntityKind::Program),
        FieldDef::text("upload_batch_no"),
        FieldDef::date("value_date", DatePattern::DayMonthYearTime),
    ],
};

pub static LOAN: Schema = Schema {
    kind: EntityKind::Loan,
    write_op: "newLoanInfo",
    read_op: "getLoanInfo",
    fields: &[
        FieldDef::text("instrument_no").references(EntityKind::Instrument),
        FieldDef::text("exposure_business_id").references(EntityKind::Business),
        FieldDef::text("program_id").references(EntityKind::Program),
        FieldDef::integer("sanction_amount"),
        FieldDef::date("sanction_date", DatePattern::DayMonthShortYearTime),
        FieldDef::text("sanction_authority"),
        FieldDef::decimal("roi"),
        FieldDef::date("due_date", DatePattern::DayMonthYear),
        FieldDef::date("value_date", DatePattern::DayMonthShortYearTime),
        FieldDef::choice("status", &LIFECYCLE_STATUS),
    ],
};

pub static LOAN_BALANCE: Schema = Schema {
    kind: EntityKind::LoanBalance,
    write_op: "putTxnInfo",
    read_op: "getTxnInfo",
    fields: &[
        FieldDef::text("loan_id").references(EntityKind::Loan),
        FieldDef::text("txn_id"),
        FieldDef::date("txn_date", DatePattern::DayMonthShortYear),
        FieldDef::choice("txn_type", &LOAN_BALANCE_TXN_TYPE),
        FieldDef::integer("opening_balance"),
        FieldDef::integer("credit_amount"),
        FieldDef::integer("debit_amount"),
        FieldDef::integer("loan_balance"),
        FieldDef::choice("status", &LIFECYCLE_STATUS),
    ],
};

pub static TRANSACTION: Schema = Schema {
    kind: EntityKind::Transaction,
    write_op: "newTxnInfo",
    read_op: "getTxnInfo",
    fields: &[
        FieldDef::choice("txn_type", &TRANSACTION_TYPE),
        FieldDef::date("txn_date", DatePattern::DayMonthYear),
        FieldDef::text("loan_id").references(EntityKind::Loan),
        FieldDef::text("instrument_id").references(EntityKind::Instrument),
        FieldDef::integer("amount"),
        FieldDef::text("from_id"),
        FieldDef::text("to_id"),
        FieldDef::text("actor"),
        FieldDef::text("program_id"),
    ],
};

pub static TXN_BALANCE: Schema = Schema {
    kind: EntityKind::TxnBalance,
    write_op: "putTxnInfo",
    read_op: "getTxnInfo",
    fields: &[
        FieldDef::text("txn_id"),
        FieldDef::date("txn_date", DatePattern::DayMonthShortYear),
        FieldDef::text("loan_id").references(EntityKind::Loan),
        FieldDef::text("instrument_id").references(EntityKind::Instrument),
        FieldDef::text("wallet_id").references(EntityKind::Wallet),
        FieldDef::integer("opening_balance"),
        FieldDef::choice("txn_type", &LEDGER_TXN_TYPE),
        FieldDef::integer("amount"),
        FieldDef::integer("credit_amount"),
        FieldDef::integer("debit_amount"),
        FieldDef::integer("balance"),
        FieldDef::text("actor"),
    ],
};

pub static WALLET: Schema = Schema {
    kind: EntityKind::Wallet,
    write_op: "newWallet",
    read_op: "getWallet",
    fields: &[FieldDef::integer("balance")],
};
