//! Entity service
//!
//! Owns a ledger store and a reference resolver and executes the write, read
//! and append operations of every entity kind. Holds no other state.

mod entity;
mod errors;
mod resolver;

pub use entity::EntityService;
pub use errors::{ServiceError, ServiceResult};
pub use resolver::{ReferenceMode, ReferenceResolver};
