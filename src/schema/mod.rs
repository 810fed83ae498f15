//! # Schema Model
//!
//! A [`Schema`] is a named, versioned list of [`FieldDefinition`]s. It is
//! the reader's side-channel for reconciling shape differences: defaults
//! for fields the wire does not carry, required-ness for fields that must
//! be there, and a version lifecycle per field.
//!
//! A field is *active in version v* iff `added_in_version <= v` and
//! `removed_in_version`, when present, is `> v`.
//!
//! The schema fingerprint is `crc32(name) ^ version`, truncated to 32
//! bits. It rides in the versioned header purely as an advisory token:
//! readers log a mismatch but never fail on it, because writer and reader
//! schemas legitimately differ during evolution, and distinct schemas can
//! collide.

pub mod validator;

use crc::{Crc, CRC_32_ISO_HDLC};

use crate::records::types::TypeTag;

pub use validator::{check_compatibility, validate, validate_nested, SchemaSet, ValidationResult};

const FINGERPRINT_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// One field of a schema, with its version lifecycle and optional default.
///
/// `default_value` is a string literal parsed as the reader's target type
/// during default materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub field_type: TypeTag,
    pub required: bool,
    pub default_value: Option<String>,
    pub added_in_version: u32,
    pub removed_in_version: Option<u32>,
}

impl FieldDefinition {
    /// A required field with no default, present since version 1.
    pub fn new(name: impl Into<String>, field_type: TypeTag) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default_value: None,
            added_in_version: 1,
            removed_in_version: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    pub fn added_in(mut self, version: u32) -> Self {
        self.added_in_version = version;
        self
    }

    pub fn removed_in(mut self, version: u32) -> Self {
        self.removed_in_version = Some(version);
        self
    }

    /// Lifecycle predicate: whether this field exists in schema version
    /// `version`.
    pub fn is_active_in(&self, version: u32) -> bool {
        self.added_in_version <= version
            && self.removed_in_version.map_or(true, |removed| removed > version)
    }

    /// Whether a reader can fill this field when the wire lacks it.
    pub fn has_default(&self) -> bool {
        self.default_value.is_some() || !self.required
    }
}

/// A named, versioned field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub name: String,
    pub version: u32,
    pub fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields active in this schema's own version.
    pub fn active_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.is_active_in(self.version))
    }

    /// Advisory header token: `crc32(name) ^ version`.
    pub fn fingerprint(&self) -> u32 {
        FINGERPRINT_CRC.checksum(self.name.as_bytes()) ^ self.version
    }
}
