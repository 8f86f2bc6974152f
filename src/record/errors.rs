//! Record decoding errors
//!
//! Error code: TL_DECODE (REJECT)
//!
//! Decoding never yields a partially populated record: the first mismatch
//! between the bytes and the schema aborts with one of these.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("record truncated: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("record length field says {declared} bytes, buffer has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("checksum mismatch: computed {computed:08x}, stored {stored:08x}")]
    ChecksumMismatch { computed: u32, stored: u32 },

    #[error("unsupported record format version {0}")]
    UnsupportedVersion(u8),

    #[error("record belongs to collection '{found}', expected '{expected}'")]
    ForeignCollection { expected: String, found: String },

    #[error("record has {found} fields, schema declares {expected}")]
    FieldCount { expected: usize, found: usize },

    #[error("field {position} is '{found}', schema declares '{expected}'")]
    FieldName {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("field '{field}' has type tag {found}, schema declares {expected}")]
    TypeTag {
        field: String,
        expected: u8,
        found: u8,
    },

    #[error("field '{field}' is not valid UTF-8")]
    InvalidUtf8 { field: String },

    #[error("field '{field}' holds non-finite decimal bits {bits:08x}")]
    NonFiniteDecimal { field: String, bits: u32 },

    #[error("field '{field}' holds out-of-range instant {seconds}")]
    InvalidInstant { field: String, seconds: i64 },

    #[error("field '{field}' holds '{value}', outside its vocabulary")]
    OutOfVocabulary { field: String, value: String },

    #[error("{0} unexpected bytes after last field")]
    TrailingBytes(usize),
}

impl DecodeError {
    pub fn code(&self) -> &'static str {
        "TL_DECODE"
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
