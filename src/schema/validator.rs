//! # Schema Validation & Compatibility Analysis
//!
//! Two operations over the schema model:
//!
//! - [`validate`] checks one schema for internal consistency (unique
//!   non-empty field names, sane version lifecycle, storable field types).
//!   Problems split into hard errors and warnings; an optional field
//!   without a default is only a warning.
//! - [`check_compatibility`] compares an old schema against its successor
//!   and reports evolution hazards: narrowed or cross-kind type changes,
//!   fields that became required, required fields that vanished, new
//!   required fields without defaults.
//!
//! Nested-struct fields reference other schemas by field name. Resolving
//! them needs a caller-supplied [`SchemaSet`]; [`validate_nested`] descends
//! through it with a visited set keyed by `(name, version)` and fails with
//! `InvalidSchema` on re-entry (a circular reference). Without a set,
//! [`validate`] flags each nested field with a warning and skips the deep
//! check.

use hashbrown::{HashMap, HashSet};

use crate::error::{Error, ErrorKind};
use crate::records::types::TypeTag;
use crate::schema::{FieldDefinition, Schema};

/// Outcome of a validation or compatibility run: hard errors abort nothing
/// by themselves but mark the schema invalid; warnings are advisory only.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<Error>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, error: Error) {
        self.errors.push(error);
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// A local, name-keyed collection of schemas used to resolve nested-struct
/// fields during deep validation.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    by_name: HashMap<String, Schema>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema: Schema) {
        self.by_name.insert(schema.name.clone(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.by_name.get(name)
    }
}

/// Intra-schema consistency check. Nested-struct fields are flagged with a
/// warning because deep validation needs a [`SchemaSet`].
pub fn validate(schema: &Schema) -> ValidationResult {
    let mut result = ValidationResult::default();
    validate_into(schema, None, &mut result);
    result
}

/// Intra-schema check plus deep validation of nested-struct fields through
/// `set`, with circular-reference detection.
pub fn validate_nested(schema: &Schema, set: &SchemaSet) -> ValidationResult {
    let mut result = ValidationResult::default();
    validate_into(schema, Some(set), &mut result);

    let mut visited = HashSet::new();
    visited.insert((schema.name.clone(), schema.version));
    descend(schema, set, &mut visited, &mut result);
    result
}

fn validate_into(schema: &Schema, set: Option<&SchemaSet>, result: &mut ValidationResult) {
    if schema.name.is_empty() {
        result.error(Error::new(
            ErrorKind::InvalidSchema,
            "schema name must not be empty",
        ));
    }
    if schema.version < 1 {
        result.error(Error::new(
            ErrorKind::InvalidSchema,
            "schema version must be at least 1",
        ));
    }

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if field.name.is_empty() {
            result.error(Error::new(
                ErrorKind::InvalidSchema,
                "field name must not be empty",
            ));
        } else if !seen.insert(field.name.as_str()) {
            result.error(
                Error::new(ErrorKind::InvalidSchema, "duplicate field name")
                    .with_field(&field.name),
            );
        }

        if field.field_type == TypeTag::Null {
            result.error(
                Error::new(
                    ErrorKind::UnsupportedType,
                    "null is not a storable field type",
                )
                .with_field(&field.name),
            );
        }

        if field.added_in_version < 1 {
            result.error(
                Error::new(
                    ErrorKind::InvalidSchema,
                    "added_in_version must be at least 1",
                )
                .with_field(&field.name),
            );
        }
        if field.added_in_version > schema.version {
            result.error(
                Error::new(
                    ErrorKind::InvalidSchema,
                    format!(
                        "field added in version {} but the schema is at version {}",
                        field.added_in_version, schema.version
                    ),
                )
                .with_field(&field.name),
            );
        }
        if let Some(removed) = field.removed_in_version {
            if removed <= field.added_in_version {
                result.error(
                    Error::new(
                        ErrorKind::InvalidSchema,
                        format!(
                            "removed_in_version {} must be greater than added_in_version {}",
                            removed, field.added_in_version
                        ),
                    )
                    .with_field(&field.name),
                );
            }
        }

        if !field.required && field.default_value.is_none() {
            result.warn(format!(
                "optional field `{}` has no default; absent values fall back to zero",
                field.name
            ));
        }

        if field.field_type == TypeTag::Struct && set.is_none() {
            result.warn(format!(
                "nested field `{}` cannot be deep-checked without a schema set",
                field.name
            ));
        }
    }
}

fn descend(
    schema: &Schema,
    set: &SchemaSet,
    visited: &mut HashSet<(String, u32)>,
    result: &mut ValidationResult,
) {
    for field in &schema.fields {
        if field.field_type != TypeTag::Struct {
            continue;
        }
        let Some(nested) = set.get(&field.name) else {
            result.warn(format!(
                "nested field `{}` has no schema in the set; skipping deep check",
                field.name
            ));
            continue;
        };

        let key = (nested.name.clone(), nested.version);
        if !visited.insert(key) {
            result.error(
                Error::new(
                    ErrorKind::InvalidSchema,
                    format!(
                        "circular reference to schema `{}` version {}",
                        nested.name, nested.version
                    ),
                )
                .with_field(&field.name),
            );
            continue;
        }

        validate_into(nested, Some(set), result);
        descend(nested, set, visited, result);
    }
}

/// Pairwise old-to-new compatibility analysis.
pub fn check_compatibility(old: &Schema, new: &Schema) -> ValidationResult {
    let mut result = ValidationResult::default();

    if old.name != new.name {
        result.error(Error::new(
            ErrorKind::IncompatibleSchema,
            format!("schema names differ: `{}` vs `{}`", old.name, new.name),
        ));
        return result;
    }

    if new.version <= old.version {
        result.warn(format!(
            "new version {} does not advance past old version {}",
            new.version, old.version
        ));
    }

    for old_field in &old.fields {
        match new.field(&old_field.name) {
            Some(new_field) => {
                check_field_evolution(old_field, new_field, &mut result);
            }
            None => {
                if old_field.required {
                    result.error(
                        Error::new(
                            ErrorKind::RequiredFieldMissing,
                            "required field was removed",
                        )
                        .with_field(&old_field.name),
                    );
                }
            }
        }
    }

    for new_field in &new.fields {
        if old.field(&new_field.name).is_none() && new_field.required && !new_field.has_default() {
            result.error(
                Error::new(
                    ErrorKind::BackwardCompatibilityError,
                    "new required field has no default, so old data cannot be read",
                )
                .with_field(&new_field.name),
            );
        }
    }

    result
}

fn check_field_evolution(
    old_field: &FieldDefinition,
    new_field: &FieldDefinition,
    result: &mut ValidationResult,
) {
    if old_field.field_type != new_field.field_type
        && !old_field.field_type.widens_to(new_field.field_type)
    {
        result.error(
            Error::new(
                ErrorKind::SchemaEvolutionError,
                "field type change narrows or crosses kinds",
            )
            .with_field(&old_field.name)
            .with_types(new_field.field_type.name(), old_field.field_type.name()),
        );
    }

    if !old_field.required && new_field.required {
        result.error(
            Error::new(
                ErrorKind::BackwardCompatibilityError,
                "optional field became required",
            )
            .with_field(&old_field.name),
        );
    }
}
