//! Typed record values
//!
//! A `Record` holds exactly one value per schema field, in schema order.
//! Records are only produced by field validation or by decoding, both of
//! which check every value against the schema.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value as JsonValue};

use crate::schema::{EntityKind, FieldDef, FieldRule, Schema};

/// A single validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    /// Stored at 32-bit precision
    Decimal(f32),
    Instant(DateTime<Utc>),
    TextList(Vec<String>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f32> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_instant(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Instant(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::TextList(items) => Some(items),
            _ => None,
        }
    }

    /// Empty value for a field that is not supplied by a write.
    pub(crate) fn empty_for(def: &FieldDef) -> Self {
        match def.rule {
            FieldRule::TextList => Value::TextList(Vec::new()),
            FieldRule::Integer => Value::Integer(0),
            FieldRule::Decimal => Value::Decimal(0.0),
            FieldRule::Date(_) => Value::Instant(DateTime::<Utc>::UNIX_EPOCH),
            FieldRule::Text | FieldRule::Choice(_) => Value::Text(String::new()),
        }
    }

    /// Renders the value the way it was accepted: dates in the field's own
    /// pattern, decimals in shortest round-trip form.
    pub fn render(&self, def: &FieldDef) -> JsonValue {
        match self {
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Integer(n) => JsonValue::from(*n),
            Value::Decimal(d) => render_decimal(*d),
            Value::Instant(t) => match def.rule {
                FieldRule::Date(pattern) => JsonValue::String(pattern.render(t)),
                _ => JsonValue::String(t.to_rfc3339()),
            },
            Value::TextList(items) => {
                JsonValue::Array(items.iter().cloned().map(JsonValue::String).collect())
            }
        }
    }
}

/// `8.5f32` renders as `8.5`, not `8.5000000000000000`, and `0.1f32` as
/// `0.1` rather than its widened f64 expansion.
fn render_decimal(d: f32) -> JsonValue {
    d.to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// A validated, typed instance of one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: EntityKind,
    values: Vec<Value>,
}

impl Record {
    /// Callers guarantee `values` matches the kind's schema field-for-field.
    pub(crate) fn from_values(kind: EntityKind, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), kind.schema().fields.len());
        Self { kind, values }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    /// Values in schema order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Looks up a value by its field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema()
            .position(name)
            .and_then(|i| self.values.get(i))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    pub fn decimal(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(Value::as_decimal)
    }

    pub fn instant(&self, name: &str) -> Option<&DateTime<Utc>> {
        self.get(name).and_then(Value::as_instant)
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    pub(crate) fn list_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        let position = self.schema().position(name)?;
        match self.values.get_mut(position) {
            Some(Value::TextList(items)) => Some(items),
            _ => None,
        }
    }

    /// Renders the record as a JSON object keyed by field name, in schema
    /// order.
    pub fn render(&self) -> JsonValue {
        let mut object = Map::new();
        for (def, value) in self.schema().fields.iter().zip(&self.values) {
            object.insert(def.name.to_string(), value.render(def));
        }
        JsonValue::Object(object)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DatePattern;
    use serde_json::json;

    fn wallet(balance: i64) -> Record {
        Record::from_values(EntityKind::Wallet, vec![Value::Integer(balance)])
    }

    #[test]
    fn test_get_by_field_name() {
        let record = wallet(500);
        assert_eq!(record.integer("balance"), Some(500));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.text("balance"), None);
    }

    #[test]
    fn test_render_follows_schema_order() {
        let schema = EntityKind::Program.schema();
        let values = schema
            .fields
            .iter()
            .map(|def| match def.rule {
                FieldRule::Choice(vocabulary) => Value::Text(vocabulary.values()[0].into()),
                _ => Value::empty_for(def),
            })
            .collect();
        let rendered = Record::from_values(EntityKind::Program, values).render();

        let keys: Vec<&str> = rendered
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        let expected: Vec<&str> = schema.fields.iter().map(|def| def.name).collect();
        assert_eq!(keys, expected);
        assert_ne!(keys[0], "anchor");
    }

    #[test]
    fn test_render_wallet() {
        assert_eq!(wallet(1000).render(), json!({ "balance": 1000 }));
        assert_eq!(wallet(-5).to_string(), r#"{"balance":-5}"#);
    }

    #[test]
    fn test_decimal_renders_shortest_form() {
        let def = FieldDef::decimal("roi");
        assert_eq!(Value::Decimal(8.5).render(&def), json!(8.5));
        assert_eq!(Value::Decimal(0.1).render(&def), json!(0.1));
        assert_eq!(Value::Decimal(2.0).render(&def), json!(2.0));
    }

    #[test]
    fn test_instant_renders_in_field_pattern() {
        let def = FieldDef::date("value_date", DatePattern::DayMonthYearTime);
        let instant = DatePattern::DayMonthYearTime
            .parse("01/06/2023:10:11:12")
            .unwrap();
        assert_eq!(
            Value::Instant(instant).render(&def),
            json!("01/06/2023:10:11:12")
        );
    }

    #[test]
    fn test_list_mut_only_for_list_fields() {
        let mut record = wallet(1);
        assert!(record.list_mut("balance").is_none());
    }
}
