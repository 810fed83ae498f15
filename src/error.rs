//! # Error Taxonomy
//!
//! Every fallible operation in the crate returns [`Error`], a structured
//! failure carrying a closed [`ErrorKind`] plus optional context: the field
//! name involved, the byte position within the buffer, and the expected and
//! actual type names for mismatches.
//!
//! All errors surface to the caller of the public entry point; nothing is
//! swallowed internally. Validator warnings travel in a separate list on
//! [`ValidationResult`](crate::schema::ValidationResult) and never abort an
//! operation. The single documented exception to propagation is default-value
//! parsing during deserialization: a schema default that no longer parses as
//! the target type recovers silently to the type's zero value.

use std::fmt;

use thiserror::Error;

/// Failure kinds. The set is closed; callers can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSchema,
    SchemaVersionMismatch,
    SchemaEvolutionError,
    IncompatibleSchema,
    InvalidData,
    InvalidMagicNumber,
    CorruptedData,
    ChecksumMismatch,
    UnsupportedType,
    TypeMismatch,
    InvalidTypeTag,
    BufferTooSmall,
    OutOfMemory,
    EndOfBuffer,
    RequiredFieldMissing,
    UnknownField,
    FieldTypeMismatch,
    FileNotFound,
    FileReadError,
    FileWriteError,
    MappingFailed,
    UnsupportedFormatVersion,
    BackwardCompatibilityError,
    ForwardCompatibilityError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidSchema => "invalid schema",
            ErrorKind::SchemaVersionMismatch => "schema version mismatch",
            ErrorKind::SchemaEvolutionError => "schema evolution error",
            ErrorKind::IncompatibleSchema => "incompatible schema",
            ErrorKind::InvalidData => "invalid data",
            ErrorKind::InvalidMagicNumber => "invalid magic number",
            ErrorKind::CorruptedData => "corrupted data",
            ErrorKind::ChecksumMismatch => "checksum mismatch",
            ErrorKind::UnsupportedType => "unsupported type",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::InvalidTypeTag => "invalid type tag",
            ErrorKind::BufferTooSmall => "buffer too small",
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::EndOfBuffer => "end of buffer",
            ErrorKind::RequiredFieldMissing => "required field missing",
            ErrorKind::UnknownField => "unknown field",
            ErrorKind::FieldTypeMismatch => "field type mismatch",
            ErrorKind::FileNotFound => "file not found",
            ErrorKind::FileReadError => "file read error",
            ErrorKind::FileWriteError => "file write error",
            ErrorKind::MappingFailed => "mapping failed",
            ErrorKind::UnsupportedFormatVersion => "unsupported format version",
            ErrorKind::BackwardCompatibilityError => "backward compatibility error",
            ErrorKind::ForwardCompatibilityError => "forward compatibility error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured failure with kind and context.
///
/// The rendered message accumulates context as it is attached, so `Display`
/// always shows the full picture; the structured accessors exist for
/// programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    field: Option<String>,
    position: Option<usize>,
    expected: Option<&'static str>,
    actual: Option<&'static str>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            position: None,
            expected: None,
            actual: None,
        }
    }

    /// Attach the field name. A first attachment wins; re-attaching from an
    /// outer frame keeps the innermost (most precise) name.
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        if self.field.is_none() {
            let name = name.into();
            self.message.push_str(&format!(" (field `{name}`)"));
            self.field = Some(name);
        }
        self
    }

    pub fn at_position(mut self, position: usize) -> Self {
        if self.position.is_none() {
            self.message.push_str(&format!(" at byte {position}"));
            self.position = Some(position);
        }
        self
    }

    pub fn with_types(mut self, expected: &'static str, actual: &'static str) -> Self {
        if self.expected.is_none() {
            self.message
                .push_str(&format!(" (expected {expected}, got {actual})"));
            self.expected = Some(expected);
            self.actual = Some(actual);
        }
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn expected(&self) -> Option<&'static str> {
        self.expected
    }

    pub fn actual(&self) -> Option<&'static str> {
        self.actual
    }
}

/// Result alias used crate-wide.
pub type Result<T> = std::result::Result<T, Error>;
