//! Field validators
//!
//! Validation semantics:
//! - Argument count is exact and checked before any field
//! - Fields are validated in schema order; the first failure aborts
//! - Enumerated values are matched case-insensitively and stored lower case
//! - Integers are base-10, signed 64-bit
//! - Decimals are parsed at 64-bit precision and narrowed to 32-bit
//! - Dates must match their field's own pattern exactly
//!
//! Validators are pure: no I/O, no state, deterministic.

use super::dates::DatePattern;
use super::errors::{FieldError, FieldResult};
use super::types::{FieldDef, FieldRule, Schema};
use super::vocabulary::Vocabulary;
use crate::record::{Record, Value};

/// Rejects any argument list whose length is not exactly `expected`.
pub fn check_arity(operation: &str, expected: usize, args: &[String]) -> FieldResult<()> {
    if args.len() != expected {
        return Err(FieldError::argument_count(operation, expected, args.len()));
    }
    Ok(())
}

pub fn parse_integer(field: &str, raw: &str) -> FieldResult<i64> {
    raw.parse::<i64>()
        .map_err(|e| FieldError::field_parse(field, raw, format!("not a 64-bit integer: {}", e)))
}

/// Parses at full precision, then narrows. The narrowed value is the one
/// stored and returned on read.
pub fn parse_decimal(field: &str, raw: &str) -> FieldResult<f32> {
    let wide = raw
        .parse::<f64>()
        .map_err(|e| FieldError::field_parse(field, raw, format!("not a decimal: {}", e)))?;
    if !wide.is_finite() {
        return Err(FieldError::field_parse(field, raw, "decimal must be finite"));
    }
    let narrow = wide as f32;
    if !narrow.is_finite() {
        return Err(FieldError::field_parse(
            field,
            raw,
            "decimal out of 32-bit range",
        ));
    }
    Ok(narrow)
}

pub fn parse_choice(field: &str, vocabulary: &Vocabulary, raw: &str) -> FieldResult<String> {
    vocabulary
        .normalize(raw)
        .ok_or_else(|| FieldError::enum_validation(field, raw, vocabulary.values()))
}

pub fn parse_date(
    field: &str,
    pattern: DatePattern,
    raw: &str,
) -> FieldResult<chrono::DateTime<chrono::Utc>> {
    pattern
        .parse(raw)
        .map_err(|reason| FieldError::field_parse(field, raw, reason))
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
/// At least one entry must remain.
pub fn parse_text_list(field: &str, raw: &str) -> FieldResult<Vec<String>> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(FieldError::field_parse(field, raw, "no list entries"));
    }
    Ok(items)
}

/// Applies one field's rule to a raw argument.
pub fn validate_field(def: &FieldDef, raw: &str) -> FieldResult<Value> {
    let value = match def.rule {
        FieldRule::Text => Value::Text(raw.to_string()),
        FieldRule::Integer => Value::Integer(parse_integer(def.name, raw)?),
        FieldRule::Decimal => Value::Decimal(parse_decimal(def.name, raw)?),
        FieldRule::Choice(vocabulary) => Value::Text(parse_choice(def.name, vocabulary, raw)?),
        FieldRule::Date(pattern) => Value::Instant(parse_date(def.name, pattern, raw)?),
        FieldRule::TextList => Value::TextList(parse_text_list(def.name, raw)?),
    };
    Ok(value)
}

/// Validates the positional arguments of a full write against a schema.
pub struct SchemaValidator {
    schema: &'static Schema,
}

impl SchemaValidator {
    pub fn new(schema: &'static Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Builds a record from the write arguments that follow the key.
    ///
    /// `args` excludes the key; arity errors still report the full count
    /// (key included) so they match what the caller sent.
    ///
    /// # Errors
    ///
    /// - `TL_ARGUMENT_COUNT` if the count is wrong
    /// - `TL_FIELD_PARSE` / `TL_ENUM_VALIDATION` for the first bad field
    pub fn validate_write(&self, args: &[String]) -> FieldResult<Record> {
        let expected = self.schema.write_arity() - 1;
        if args.len() != expected {
            return Err(FieldError::argument_count(
                self.schema.write_op,
                expected + 1,
                args.len() + 1,
            ));
        }

        let mut args = args.iter();
        let mut values = Vec::with_capacity(self.schema.fields.len());
        for def in self.schema.fields {
            let value = if def.is_argument() {
                match args.next() {
                    Some(raw) => validate_field(def, raw)?,
                    None => {
                        return Err(FieldError::argument_count(
                            self.schema.write_op,
                            expected + 1,
                            values.len() + 1,
                        ))
                    }
                }
            } else {
                Value::empty_for(def)
            };
            values.push(value);
        }

        Ok(Record::from_values(self.schema.kind, values))
    }
}
