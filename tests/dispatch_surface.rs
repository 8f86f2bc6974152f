//! Dispatch Surface Tests
//!
//! Drives the engine the way a host does: JSON invocations in, JSON
//! responses out.

use serde_json::{json, Value};
use tradeledger::cli::serve_lines;
use tradeledger::dispatch::{Dispatcher, Invocation, Operation, Response};
use tradeledger::schema::EntityKind;
use tradeledger::service::{EntityService, ReferenceMode};
use tradeledger::store::MemoryLedger;

// =============================================================================
// Test Utilities
// =============================================================================

fn dispatcher() -> Dispatcher<MemoryLedger> {
    Dispatcher::new(EntityService::new(
        MemoryLedger::new(),
        ReferenceMode::Permissive,
    ))
}

fn call(d: &mut Dispatcher<MemoryLedger>, contract: &str, function: &str, args: &[&str]) -> Value {
    d.handle(&Invocation::new(contract, function, args.iter().copied()))
        .to_value()
}

const WRITE_PROGRAM: [&str; 13] = [
    "P1",
    "SupplyFin",
    "AcmeCo",
    "ar",
    "01/01/2024",
    "31/12/2024",
    "100000",
    "8.5",
    "buyer",
    "2.0",
    "30",
    "AuthA",
    "01/01/2024",
];

// =============================================================================
// End-to-End
// =============================================================================

#[test]
fn test_write_program_then_get_program() {
    let mut d = dispatcher();
    assert_eq!(
        call(&mut d, "program", "writeProgram", &WRITE_PROGRAM),
        json!({"status": "ok", "data": null})
    );

    let response = call(&mut d, "program", "getProgram", &["P1"]);
    assert_eq!(response["status"], "ok");
    let data = &response["data"];
    assert_eq!(data["name"], "SupplyFin");
    assert_eq!(data["anchor"], "AcmeCo");
    assert_eq!(data["program_type"], "ar");
    assert_eq!(data["start_date"], "01/01/2024");
    assert_eq!(data["end_date"], "31/12/2024");
    assert_eq!(data["limit"], 100000);
    assert_eq!(data["roi"], json!(8.5));
    assert_eq!(data["exposure"], "buyer");
    assert_eq!(data["discount_percentage"], json!(2.0));
    assert_eq!(data["discount_period"], 30);
    assert_eq!(data["sanction_authority"], "AuthA");
    assert_eq!(data["sanction_date"], "01/01/2024");
}

#[test]
fn test_repayment_accounts_append_over_dispatch() {
    let mut d = dispatcher();
    call(&mut d, "program", "writeProgram", &WRITE_PROGRAM);
    call(&mut d, "program", "addRepaymentAccounts", &["P1", "A,B"]);
    call(&mut d, "program", "addRepaymentAccounts", &["P1", "C"]);

    let response = call(&mut d, "program", "getProgram", &["P1"]);
    assert_eq!(response["data"]["repayment_accounts"], json!(["A", "B", "C"]));
}

#[test]
fn test_business_read_returns_rendering() {
    let mut d = dispatcher();
    call(
        &mut d,
        "business",
        "putNewBusinessInfo",
        &["BZ1", "AcmeCo", "ACC-1", "500000", "W1", "W2", "W3", "12.5", "9.75", "2", "buyer"],
    );
    let response = call(&mut d, "business", "getBusinessInfo", &["BZ1"]);
    assert_eq!(response["data"]["credit_limit"], 500000);
    assert_eq!(response["data"]["min_roi"], json!(9.75));
}

// =============================================================================
// Error Responses
// =============================================================================

#[test]
fn test_error_responses_carry_codes() {
    let mut d = dispatcher();

    let response = call(&mut d, "wallet", "getWallet", &["W-404"]);
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], "TL_NOT_FOUND");
    assert_eq!(response["retryable"], false);

    let response = call(&mut d, "wallet", "newWallet", &["W1"]);
    assert_eq!(response["code"], "TL_ARGUMENT_COUNT");

    let response = call(&mut d, "wallet", "newWallet", &["W1", "12.5"]);
    assert_eq!(response["code"], "TL_FIELD_PARSE");

    let response = call(&mut d, "transaction", "newTxnInfo", &[
        "T1", "transfer", "05/06/2023", "L1", "I1", "10", "a", "b", "c", "P1",
    ]);
    assert_eq!(response["code"], "TL_ENUM_VALIDATION");

    let response = call(&mut d, "ledger", "getWallet", &["W1"]);
    assert_eq!(response["code"], "TL_UNKNOWN_OPERATION");

    let response = call(&mut d, "wallet", "addRepaymentAccounts", &["W1", "A"]);
    assert_eq!(response["code"], "TL_UNKNOWN_OPERATION");

    // None of the rejected calls wrote anything.
    assert!(d.service().store().is_empty());
}

#[test]
fn test_every_cataloged_operation_routes() {
    for op in Operation::all() {
        let resolved = Operation::resolve(op.kind().collection(), op.function());
        assert_eq!(resolved, Some(op));
    }
    assert_eq!(
        Operation::resolve("loan", "newLoanInfo").map(|op| op.arity()),
        Some(EntityKind::Loan.schema().write_arity())
    );
}

#[test]
fn test_serve_loop_over_json_lines() {
    let mut d = dispatcher();
    let input = [
        json!({"contract": "wallet", "function": "newWallet", "args": ["W1", "1000"]}),
        json!({"contract": "wallet", "function": "newWallet", "args": ["W1", "500"]}),
        json!({"contract": "wallet", "function": "getWallet", "args": ["W1"]}),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    let mut out = Vec::new();
    let (handled, failed) = serve_lines(&mut d, input.as_bytes(), &mut out).unwrap();
    assert_eq!((handled, failed), (3, 0));

    let last: Value = String::from_utf8(out)
        .unwrap()
        .lines()
        .last()
        .map(|l| serde_json::from_str(l).unwrap())
        .unwrap();
    assert_eq!(last, Response::success(json!({"balance": 500})).to_value());
}

#[test]
fn test_serve_loop_survives_non_utf8_line() {
    let mut d = dispatcher();
    let mut input = Vec::new();
    input.extend_from_slice(br#"{"contract":"wallet","function":"newWallet","args":["W1","1000"]}"#);
    input.extend_from_slice(b"\n\xff\xfe garbage\n");
    input.extend_from_slice(br#"{"contract":"wallet","function":"newWallet","args":["W2","500"]}"#);
    input.push(b'\n');

    let mut out = Vec::new();
    let (handled, failed) = serve_lines(&mut d, input.as_slice(), &mut out).unwrap();
    assert_eq!((handled, failed), (3, 1));

    let responses: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["status"], "ok");
    assert_eq!(responses[1]["code"], "TL_INVALID_REQUEST");
    assert_eq!(responses[1]["retryable"], false);
    assert_eq!(responses[2]["status"], "ok");

    assert_eq!(
        call(&mut d, "wallet", "getWallet", &["W2"]),
        json!({"status": "ok", "data": {"balance": 500}})
    );
}
