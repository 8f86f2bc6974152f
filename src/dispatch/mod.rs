//! Invocation dispatch
//!
//! Turns `{contract, function, args}` invocations into entity service calls
//! and service outcomes into JSON responses.
//!
//! # Flow
//!
//! 1. Resolve the contract/function pair
//! 2. Check the exact argument count (key included)
//! 3. Execute against the service
//! 4. Pass error codes through unchanged

mod errors;
mod request;
mod response;
mod router;

pub use errors::{DispatchError, DispatchResult};
pub use request::Invocation;
pub use response::Response;
pub use router::{Dispatcher, Operation, ADD_REPAYMENT_ACCOUNTS};
