//! Schema type definitions
//!
//! A schema is an ordered list of field definitions for one entity kind.
//! Order matters twice: it is the positional argument order of the write
//! operation, and it is the field order of the persisted encoding.

use super::dates::DatePattern;
use super::entity::EntityKind;
use super::vocabulary::Vocabulary;

/// Persisted value types. The tag is written into every encoded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string
    Text = 1,
    /// 64-bit signed integer
    Integer = 2,
    /// 32-bit floating point
    Decimal = 3,
    /// UTC instant, whole seconds
    Instant = 4,
    /// Ordered list of strings
    TextList = 5,
}

impl FieldType {
    pub fn tag(&self) -> u8 {
        *self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(FieldType::Text),
            2 => Some(FieldType::Integer),
            3 => Some(FieldType::Decimal),
            4 => Some(FieldType::Instant),
            5 => Some(FieldType::TextList),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Instant => "instant",
            FieldType::TextList => "text list",
        }
    }
}

/// How a raw argument is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Accepted verbatim
    Text,
    /// Base-10 signed 64-bit integer (amounts, limits, counts)
    Integer,
    /// Parsed at 64-bit precision, stored at 32-bit
    Decimal,
    /// Case-insensitive member of a vocabulary, stored lower case
    Choice(&'static Vocabulary),
    /// Fixed-format date
    Date(DatePattern),
    /// Comma-separated list, only ever appended to
    TextList,
}

impl FieldRule {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldRule::Text | FieldRule::Choice(_) => FieldType::Text,
            FieldRule::Integer => FieldType::Integer,
            FieldRule::Decimal => FieldType::Decimal,
            FieldRule::Date(_) => FieldType::Instant,
            FieldRule::TextList => FieldType::TextList,
        }
    }
}

/// Where a field's value comes from on a full write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Next positional argument of the write operation
    Argument,
    /// Not supplied by the write operation; starts empty
    Derived,
}

/// One field of an entity schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Name used both on the wire and in rendered output
    pub name: &'static str,
    pub rule: FieldRule,
    pub source: FieldSource,
    /// Entity kind whose key this field holds, if any
    pub reference: Option<EntityKind>,
}

impl FieldDef {
    const fn argument(name: &'static str, rule: FieldRule) -> Self {
        Self {
            name,
            rule,
            source: FieldSource::Argument,
            reference: None,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::argument(name, FieldRule::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::argument(name, FieldRule::Integer)
    }

    pub const fn decimal(name: &'static str) -> Self {
        Self::argument(name, FieldRule::Decimal)
    }

    pub const fn choice(name: &'static str, vocabulary: &'static Vocabulary) -> Self {
        Self::argument(name, FieldRule::Choice(vocabulary))
    }

    pub const fn date(name: &'static str, pattern: DatePattern) -> Self {
        Self::argument(name, FieldRule::Date(pattern))
    }

    pub const fn derived_list(name: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::TextList,
            source: FieldSource::Derived,
            reference: None,
        }
    }

    /// Marks this field as holding the key of another entity.
    pub const fn references(self, kind: EntityKind) -> Self {
        Self {
            reference: Some(kind),
            ..self
        }
    }

    pub fn field_type(&self) -> FieldType {
        self.rule.field_type()
    }

    pub fn is_argument(&self) -> bool {
        self.source == FieldSource::Argument
    }
}

/// Complete, immutable description of one entity kind.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub kind: EntityKind,
    /// Name of the full-replace write operation
    pub write_op: &'static str,
    /// Name of the read operation
    pub read_op: &'static str,
    /// Fields in positional and persisted order (key excluded)
    pub fields: &'static [FieldDef],
}

impl Schema {
    /// Positional arguments of the write operation, key included.
    pub fn write_arity(&self) -> usize {
        1 + self.argument_fields().count()
    }

    pub fn argument_fields(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter().filter(|f| f.is_argument())
    }

    pub fn reference_fields(&self) -> impl Iterator<Item = (usize, &'static FieldDef)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.reference.is_some())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
