//! Error types for `campus-core`.
//!
//! Caller-data faults ([`PatternError`], [`ValidationError`]) are
//! recoverable and meant to be shown to the end user as-is. A
//! [`DefinitionError`] means a model was declared inconsistently, which is a
//! bug in the model itself.

use serde_json::Value;
use thiserror::Error;

use crate::model::FieldClass;

// ─── Pattern layer ───────────────────────────────────────────────────────────

/// A raw value rejected by a pattern type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
  #[error("{type_name}: {value:?} does not match pattern {pattern}")]
  Mismatch {
    type_name: &'static str,
    pattern:   &'static str,
    value:     String,
  },

  /// The outer grammar matched but a decomposed sub-value was rejected.
  #[error("{type_name}: invalid {component} in {value:?}: {source}")]
  Component {
    type_name: &'static str,
    component: &'static str,
    value:     String,
    source:    Box<PatternError>,
  },

  #[error("{type_name}: {value:?} is out of range: {reason}")]
  OutOfRange {
    type_name: &'static str,
    value:     String,
    reason:    String,
  },

  #[error("{type_name}: expected a JSON {expected}, got {found}")]
  WrongJsonType {
    type_name: &'static str,
    expected:  &'static str,
    found:     &'static str,
  },
}

// ─── Model layer ─────────────────────────────────────────────────────────────

/// One rejected field in a batch validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
  pub field: String,
  pub error: PatternError,
}

impl std::fmt::Display for FieldFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: {}", self.field, self.error)
  }
}

/// A payload rejected by a model schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{model}: expected a JSON object, got {found}")]
  NotAnObject {
    model: &'static str,
    found: &'static str,
  },

  #[error("{model}: unknown fields: {}", .fields.join(", "))]
  UnknownFields {
    model:  &'static str,
    fields: Vec<String>,
  },

  #[error("{model}: missing fields: {}", .fields.join(", "))]
  MissingFields {
    model:  &'static str,
    fields: Vec<String>,
  },

  #[error("{model}: {} invalid field(s): {}", .failures.len(), join_failures(.failures))]
  InvalidFields {
    model:    &'static str,
    failures: Vec<FieldFailure>,
  },

  #[error("{model}: unknown field: {field} (got {value})")]
  UnknownField {
    model: &'static str,
    field: String,
    value: Value,
  },

  #[error("{model}: field {field} is hidden (got {value})")]
  HiddenField {
    model: &'static str,
    field: String,
    value: Value,
  },

  #[error("{model}: field {field} is response-only (got {value})")]
  ResponseOnlyField {
    model: &'static str,
    field: String,
    value: Value,
  },

  #[error("{model}.{field}: {source}")]
  InvalidField {
    model:  &'static str,
    field:  String,
    source: PatternError,
  },

  #[error("{model}: required fields are missing: {}", .fields.join(", "))]
  MissingRequired {
    model:  &'static str,
    fields: Vec<String>,
  },
}

impl ValidationError {
  /// Names of every field this error is about.
  pub fn fields(&self) -> Vec<&str> {
    match self {
      Self::NotAnObject { .. } => Vec::new(),
      Self::UnknownFields { fields, .. }
      | Self::MissingFields { fields, .. }
      | Self::MissingRequired { fields, .. } => {
        fields.iter().map(String::as_str).collect()
      }
      Self::InvalidFields { failures, .. } => {
        failures.iter().map(|f| f.field.as_str()).collect()
      }
      Self::UnknownField { field, .. }
      | Self::HiddenField { field, .. }
      | Self::ResponseOnlyField { field, .. }
      | Self::InvalidField { field, .. } => vec![field.as_str()],
    }
  }
}

fn join_failures(failures: &[FieldFailure]) -> String {
  failures
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}

/// An inconsistent model declaration, detected when its schema is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
  #[error("{model}.{field} cannot be both {first} and {second}")]
  Conflict {
    model:  &'static str,
    field:  &'static str,
    first:  FieldClass,
    second: FieldClass,
  },

  #[error("{model}.{field} is declared more than once")]
  DuplicateField {
    model: &'static str,
    field: &'static str,
  },

  #[error("{model}: {class} names undeclared field {field}")]
  UndeclaredField {
    model: &'static str,
    field: &'static str,
    class: FieldClass,
  },
}

/// Lookup of a field the record does not carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{model}.{field}: no such field")]
pub struct NoSuchField {
  pub model: &'static str,
  pub field: String,
}

// ─── Crate error ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Pattern(#[from] PatternError),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Definition(#[from] DefinitionError),

  #[error(transparent)]
  NoSuchField(#[from] NoSuchField),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
