//! Canonical record encoding
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, whole record)
//! +------------------+
//! | Format Version   | (u8)
//! +------------------+
//! | Collection       | (u16-prefixed string)
//! +------------------+
//! | Field Count      | (u16 LE)
//! +------------------+
//! | Fields...        | name (u16-prefixed), type tag (u8), payload
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Payloads: text is u32-prefixed UTF-8; integer is i64 LE; decimal is the
//! f32 bit pattern as u32 LE; instant is i64 LE seconds since the epoch; a
//! text list is a u32 count followed by texts.
//!
//! Checksum covers all bytes except the checksum itself. Field names are
//! written explicitly from the schema, so every declared field is always
//! present in the encoding.

use chrono::DateTime;

use super::errors::{DecodeError, DecodeResult};
use super::value::{Record, Value};
use crate::checksum::compute_checksum;
use crate::schema::{EntityKind, FieldRule, FieldType};

/// Current encoding version
pub const FORMAT_VERSION: u8 = 1;

/// length + version + empty collection + field count + checksum
const MIN_RECORD_SIZE: usize = 4 + 1 + 2 + 2 + 4;

fn value_type(value: &Value) -> FieldType {
    match value {
        Value::Text(_) => FieldType::Text,
        Value::Integer(_) => FieldType::Integer,
        Value::Decimal(_) => FieldType::Decimal,
        Value::Instant(_) => FieldType::Instant,
        Value::TextList(_) => FieldType::TextList,
    }
}

fn put_short_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u16).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

/// Serializes a record. Deterministic: equal records encode to equal bytes.
pub fn encode(record: &Record) -> Vec<u8> {
    let schema = record.schema();
    let mut body = Vec::new();

    body.push(FORMAT_VERSION);
    put_short_str(&mut body, schema.kind.collection());
    body.extend_from_slice(&(schema.fields.len() as u16).to_le_bytes());

    for (def, value) in schema.fields.iter().zip(record.values()) {
        put_short_str(&mut body, def.name);
        body.push(value_type(value).tag());
        match value {
            Value::Text(s) => put_str(&mut body, s),
            Value::Integer(n) => body.extend_from_slice(&n.to_le_bytes()),
            Value::Decimal(d) => body.extend_from_slice(&d.to_bits().to_le_bytes()),
            Value::Instant(t) => body.extend_from_slice(&t.timestamp().to_le_bytes()),
            Value::TextList(items) => {
                body.extend_from_slice(&(items.len() as u32).to_le_bytes());
                for item in items {
                    put_str(&mut body, item);
                }
            }
        }
    }

    let record_length = (4 + body.len() + 4) as u32;
    let mut record_bytes = Vec::with_capacity(record_length as usize);
    record_bytes.extend_from_slice(&record_length.to_le_bytes());
    record_bytes.extend_from_slice(&body);
    let checksum = compute_checksum(&record_bytes);
    record_bytes.extend_from_slice(&checksum.to_le_bytes());

    record_bytes
}

/// Bounds-checked cursor over the record body.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Offset of `buf[0]` within the full record, for error reporting
    base: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> DecodeResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                offset: self.base + self.pos,
                needed: n - self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> DecodeResult<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> DecodeResult<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn i64(&mut self) -> DecodeResult<i64> {
        Ok(i64::from_le_bytes(self.array()?))
    }

    fn utf8(&mut self, len: usize, field: &str) -> DecodeResult<String> {
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 {
            field: field.to_string(),
        })
    }

    fn short_str(&mut self, field: &str) -> DecodeResult<String> {
        let len = self.u16()? as usize;
        self.utf8(len, field)
    }

    fn str(&mut self, field: &str) -> DecodeResult<String> {
        let len = self.u32()? as usize;
        self.utf8(len, field)
    }
}

/// Deserializes a record of `kind`, verifying length, checksum, and that
/// every field matches the kind's schema.
pub fn decode(kind: EntityKind, data: &[u8]) -> DecodeResult<Record> {
    if data.len() < MIN_RECORD_SIZE {
        return Err(DecodeError::Truncated {
            offset: data.len(),
            needed: MIN_RECORD_SIZE - data.len(),
        });
    }

    let declared = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if declared != data.len() {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: data.len(),
        });
    }

    let checksum_offset = data.len() - 4;
    let stored = u32::from_le_bytes([
        data[checksum_offset],
        data[checksum_offset + 1],
        data[checksum_offset + 2],
        data[checksum_offset + 3],
    ]);
    let computed = compute_checksum(&data[..checksum_offset]);
    if computed != stored {
        return Err(DecodeError::ChecksumMismatch { computed, stored });
    }

    let mut reader = Reader::new(&data[4..checksum_offset], 4);

    let version = reader.u8()?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let collection = reader.short_str("$collection")?;
    if collection != kind.collection() {
        return Err(DecodeError::ForeignCollection {
            expected: kind.collection().to_string(),
            found: collection,
        });
    }

    let schema = kind.schema();
    let field_count = reader.u16()? as usize;
    if field_count != schema.fields.len() {
        return Err(DecodeError::FieldCount {
            expected: schema.fields.len(),
            found: field_count,
        });
    }

    let mut values = Vec::with_capacity(field_count);
    for (position, def) in schema.fields.iter().enumerate() {
        let name = reader.short_str("$name")?;
        if name != def.name {
            return Err(DecodeError::FieldName {
                position,
                expected: def.name.to_string(),
                found: name,
            });
        }

        let expected = def.field_type();
        let tag = reader.u8()?;
        if tag != expected.tag() {
            return Err(DecodeError::TypeTag {
                field: def.name.to_string(),
                expected: expected.tag(),
                found: tag,
            });
        }

        let value = match expected {
            FieldType::Text => Value::Text(reader.str(def.name)?),
            FieldType::Integer => Value::Integer(reader.i64()?),
            FieldType::Decimal => {
                let bits = reader.u32()?;
                let decimal = f32::from_bits(bits);
                if !decimal.is_finite() {
                    return Err(DecodeError::NonFiniteDecimal {
                        field: def.name.to_string(),
                        bits,
                    });
                }
                Value::Decimal(decimal)
            }
            FieldType::Instant => {
                let seconds = reader.i64()?;
                let instant = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
                    DecodeError::InvalidInstant {
                        field: def.name.to_string(),
                        seconds,
                    }
                })?;
                Value::Instant(instant)
            }
            FieldType::TextList => {
                let count = reader.u32()? as usize;
                // Each item needs at least its 4-byte length prefix.
                if count > reader.remaining() / 4 {
                    return Err(DecodeError::Truncated {
                        offset: reader.base + reader.pos,
                        needed: count * 4 - reader.remaining(),
                    });
                }
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(reader.str(def.name)?);
                }
                Value::TextList(items)
            }
        };

        if let (FieldRule::Choice(vocabulary), Value::Text(s)) = (&def.rule, &value) {
            if !vocabulary.contains(s) {
                return Err(DecodeError::OutOfVocabulary {
                    field: def.name.to_string(),
                    value: s.clone(),
                });
            }
        }

        values.push(value);
    }

    if reader.remaining() > 0 {
        return Err(DecodeError::TrailingBytes(reader.remaining()));
    }

    Ok(Record::from_values(kind, values))
}
