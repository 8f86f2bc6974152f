//! Cross-entity reference checks
//!
//! In strict mode every non-empty reference field of a record must name a
//! key that already holds a value in the target kind's namespace. In
//! permissive mode references are stored unchecked.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{ServiceError, ServiceResult};
use crate::record::{Record, Value};
use crate::store::LedgerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    Strict,
    #[default]
    Permissive,
}

impl fmt::Display for ReferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceMode::Strict => write!(f, "strict"),
            ReferenceMode::Permissive => write!(f, "permissive"),
        }
    }
}

impl FromStr for ReferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(ReferenceMode::Strict),
            "permissive" => Ok(ReferenceMode::Permissive),
            other => Err(format!(
                "unknown reference mode '{}' (expected strict or permissive)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver {
    mode: ReferenceMode,
}

impl ReferenceResolver {
    pub fn new(mode: ReferenceMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ReferenceMode {
        self.mode
    }

    /// Checks the record's reference fields in schema order and reports the
    /// first dangling one.
    pub fn check<S: LedgerStore + ?Sized>(&self, record: &Record, store: &S) -> ServiceResult<()> {
        if self.mode == ReferenceMode::Permissive {
            return Ok(());
        }

        for (position, def) in record.schema().reference_fields() {
            let target = match def.reference {
                Some(target) => target,
                None => continue,
            };
            let key = match record.values().get(position) {
                Some(Value::Text(key)) if !key.is_empty() => key,
                _ => continue,
            };
            if !store.contains(&target.storage_key(key))? {
                return Err(ServiceError::ReferenceNotFound {
                    field: def.name.to_string(),
                    target,
                    key: key.clone(),
                });
            }
        }

        Ok(())
    }
}
