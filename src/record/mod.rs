//! Record subsystem
//!
//! Typed records and their canonical persisted encoding.
//!
//! # Guarantees
//!
//! - `decode(kind, &encode(r)) == r` for every record a schema can produce
//! - Decode fails on any mismatch; no partially populated records
//! - Field order and type fidelity are preserved
//! - Checksum verified on every decode

mod codec;
mod errors;
mod value;

pub use codec::{decode, encode, FORMAT_VERSION};
pub use errors::{DecodeError, DecodeResult};
pub use value::{Record, Value};
