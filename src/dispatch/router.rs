//! Operation routing
//!
//! Contracts are addressed by collection name; functions by the operation
//! names declared in each schema. Several contracts share function names
//! (`putTxnInfo`, `getTxnInfo`), so routing always uses the pair.

use serde_json::Value;
use tracing::{info_span, warn};
use uuid::Uuid;

use super::errors::{DispatchError, DispatchResult};
use super::request::Invocation;
use super::response::Response;
use crate::schema::{check_arity, EntityKind};
use crate::service::EntityService;
use crate::store::LedgerStore;

/// Append operation exposed on the program contract.
pub const ADD_REPAYMENT_ACCOUNTS: &str = "addRepaymentAccounts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Full replace of one entity
    Write(EntityKind),
    Read(EntityKind),
    AppendRepaymentAccounts,
}

impl Operation {
    /// Resolves a contract/function pair.
    pub fn resolve(contract: &str, function: &str) -> Option<Self> {
        let kind = EntityKind::from_collection(contract)?;
        let schema = kind.schema();
        if function == schema.write_op {
            Some(Operation::Write(kind))
        } else if function == schema.read_op {
            Some(Operation::Read(kind))
        } else if kind == EntityKind::Program && function == ADD_REPAYMENT_ACCOUNTS {
            Some(Operation::AppendRepaymentAccounts)
        } else {
            None
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Operation::Write(kind) | Operation::Read(kind) => *kind,
            Operation::AppendRepaymentAccounts => EntityKind::Program,
        }
    }

    pub fn function(&self) -> &'static str {
        match self {
            Operation::Write(kind) => kind.schema().write_op,
            Operation::Read(kind) => kind.schema().read_op,
            Operation::AppendRepaymentAccounts => ADD_REPAYMENT_ACCOUNTS,
        }
    }

    /// Exact positional argument count, key included.
    pub fn arity(&self) -> usize {
        match self {
            Operation::Write(kind) => kind.schema().write_arity(),
            Operation::Read(_) => 1,
            Operation::AppendRepaymentAccounts => 2,
        }
    }

    /// Every operation, grouped by contract in declaration order.
    pub fn all() -> Vec<Operation> {
        let mut ops = Vec::new();
        for kind in EntityKind::ALL {
            ops.push(Operation::Write(kind));
            if kind == EntityKind::Program {
                ops.push(Operation::AppendRepaymentAccounts);
            }
            ops.push(Operation::Read(kind));
        }
        ops
    }
}

/// Routes invocations to an entity service.
pub struct Dispatcher<S: LedgerStore> {
    service: EntityService<S>,
}

impl<S: LedgerStore> Dispatcher<S> {
    pub fn new(service: EntityService<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &EntityService<S> {
        &self.service
    }

    pub fn into_service(self) -> EntityService<S> {
        self.service
    }

    /// Runs one invocation. Writes yield `null`, reads the record rendering.
    pub fn invoke(&mut self, invocation: &Invocation) -> DispatchResult<Value> {
        let op = Operation::resolve(&invocation.contract, &invocation.function).ok_or_else(|| {
            DispatchError::unknown_operation(&invocation.contract, &invocation.function)
        })?;
        check_arity(op.function(), op.arity(), &invocation.args)?;

        let (key, rest) = match invocation.args.split_first() {
            Some((key, rest)) => (key.as_str(), rest),
            None => return Err(DispatchError::invalid_request("missing key argument")),
        };

        match op {
            Operation::Write(kind) => {
                self.service.write(kind, key, rest)?;
                Ok(Value::Null)
            }
            Operation::Read(kind) => Ok(self.service.read(kind, key)?.render()),
            Operation::AppendRepaymentAccounts => {
                let accounts = rest.first().map(String::as_str).unwrap_or_default();
                self.service.append_repayment_accounts(key, accounts)?;
                Ok(Value::Null)
            }
        }
    }

    /// Runs one invocation and folds the outcome into a response.
    pub fn handle(&mut self, invocation: &Invocation) -> Response {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            "invoke",
            id = %invocation_id,
            contract = %invocation.contract,
            function = %invocation.function
        );
        let _enter = span.enter();

        match self.invoke(invocation) {
            Ok(data) => Response::success(data),
            Err(err) => {
                warn!(code = err.code(), severity = %err.severity(), error = %err, "invocation rejected");
                Response::error(&err)
            }
        }
    }

    /// Parses and runs one JSON-encoded invocation.
    pub fn handle_json(&mut self, json: &str) -> Response {
        match Invocation::parse(json) {
            Ok(invocation) => self.handle(&invocation),
            Err(err) => {
                warn!(code = err.code(), error = %err, "unparseable invocation");
                Response::error(&err)
            }
        }
    }
}
