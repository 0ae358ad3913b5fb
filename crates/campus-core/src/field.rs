//! The JSON-level contract a model field satisfies.
//!
//! Every [`PatternType`] is a [`FieldType`] whose wire form is a JSON string.
//! The few non-string shapes the Campus API uses (access values, id-keyed
//! maps, opaque objects) implement the same contract here.

use std::{any::Any, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{
  error::PatternError,
  ids::CampusId,
  pattern::PatternType,
};

// ─── Contract ────────────────────────────────────────────────────────────────

/// A value type a model field can be declared as.
pub trait FieldType: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
  fn type_name() -> &'static str;

  /// Check `raw` without building a value. Succeeds iff
  /// [`from_json`](Self::from_json) would.
  fn check(raw: &Value) -> Result<(), PatternError>;

  fn from_json(raw: &Value) -> Result<Self, PatternError>;

  /// The canonical wire form.
  fn to_json(&self) -> Value;

  /// OpenAPI 3.0 schema fragment.
  fn schema() -> Value;
}

/// Name of the JSON kind of `value`, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

pub(crate) fn expect_str<T: PatternType>(raw: &Value) -> Result<&str, PatternError> {
  raw.as_str().ok_or_else(|| PatternError::WrongJsonType {
    type_name: T::TYPE_NAME,
    expected:  "string",
    found:     json_kind(raw),
  })
}

fn expect_object<'a>(
  type_name: &'static str,
  raw: &'a Value,
) -> Result<&'a Map<String, Value>, PatternError> {
  raw.as_object().ok_or_else(|| PatternError::WrongJsonType {
    type_name,
    expected: "object",
    found: json_kind(raw),
  })
}

// ─── Type-erased values ──────────────────────────────────────────────────────

/// A field value with its concrete type erased, as stored in a
/// [`Record`](crate::model::Record).
pub trait FieldValue: fmt::Debug + Send + Sync {
  /// [`FieldType::type_name`] of the concrete type.
  fn kind(&self) -> &'static str;
  /// [`FieldType::to_json`] of the concrete value.
  fn json(&self) -> Value;
  fn as_any(&self) -> &dyn Any;
  /// Equal iff `other` has the same concrete type and value.
  fn eq_field(&self, other: &dyn FieldValue) -> bool;
  fn clone_field(&self) -> Box<dyn FieldValue>;
}

impl<T: FieldType> FieldValue for T {
  fn kind(&self) -> &'static str { T::type_name() }

  fn json(&self) -> Value { self.to_json() }

  fn as_any(&self) -> &dyn Any { self }

  fn eq_field(&self, other: &dyn FieldValue) -> bool {
    other.as_any().downcast_ref::<T>().is_some_and(|other| other == self)
  }

  fn clone_field(&self) -> Box<dyn FieldValue> { Box::new(self.clone()) }
}

impl dyn FieldValue + '_ {
  pub fn downcast_ref<T: FieldType>(&self) -> Option<&T> {
    self.as_any().downcast_ref::<T>()
  }
}

impl PartialEq for dyn FieldValue + '_ {
  fn eq(&self, other: &Self) -> bool { self.eq_field(other) }
}

impl Clone for Box<dyn FieldValue> {
  fn clone(&self) -> Self { self.clone_field() }
}

impl fmt::Display for dyn FieldValue + '_ {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.json() {
      Value::String(s) => f.write_str(&s),
      other => write!(f, "{other}"),
    }
  }
}

// ─── AccessValue ─────────────────────────────────────────────────────────────

/// A member's access level within a circle: a non-negative JSON integer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccessValue(u32);

impl AccessValue {
  pub fn new(value: u32) -> Self { Self(value) }

  pub fn get(self) -> u32 { self.0 }

  fn parse(raw: &Value) -> Result<u32, PatternError> {
    let Value::Number(number) = raw else {
      return Err(PatternError::WrongJsonType {
        type_name: "AccessValue",
        expected:  "integer",
        found:     json_kind(raw),
      });
    };
    number
      .as_u64()
      .and_then(|n| u32::try_from(n).ok())
      .ok_or_else(|| PatternError::OutOfRange {
        type_name: "AccessValue",
        value:     number.to_string(),
        reason:    format!("expected an integer between 0 and {}", u32::MAX),
      })
  }
}

impl FieldType for AccessValue {
  fn type_name() -> &'static str { "AccessValue" }

  fn check(raw: &Value) -> Result<(), PatternError> { Self::parse(raw).map(|_| ()) }

  fn from_json(raw: &Value) -> Result<Self, PatternError> { Self::parse(raw).map(Self) }

  fn to_json(&self) -> Value { Value::from(self.0) }

  fn schema() -> Value {
    json!({ "type": "integer", "format": "int64", "minimum": 0, "maximum": u32::MAX })
  }
}

// ─── Mapping ─────────────────────────────────────────────────────────────────

/// A JSON object whose keys are pattern type `K` and values field type `V`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping<K, V> {
  entries: BTreeMap<K, V>,
}

/// Circle membership: member id to access value.
pub type Members = Mapping<CampusId, AccessValue>;

impl<K: PatternType, V: FieldType> Mapping<K, V> {
  pub fn get(&self, key: &K) -> Option<&V> { self.entries.get(key) }

  pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> { self.entries.iter() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  fn key_error(raw_key: &str, source: PatternError) -> PatternError {
    PatternError::Component {
      type_name: "Mapping",
      component: "key",
      value:     raw_key.to_owned(),
      source:    Box::new(source),
    }
  }

  fn value_error(raw_key: &str, source: PatternError) -> PatternError {
    PatternError::Component {
      type_name: "Mapping",
      component: "value",
      value:     raw_key.to_owned(),
      source:    Box::new(source),
    }
  }
}

impl<K: PatternType, V: FieldType> FromIterator<(K, V)> for Mapping<K, V> {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self { entries: iter.into_iter().collect() }
  }
}

impl<K: PatternType, V: FieldType> FieldType for Mapping<K, V> {
  fn type_name() -> &'static str { "Mapping" }

  fn check(raw: &Value) -> Result<(), PatternError> {
    for (raw_key, raw_value) in expect_object(Self::type_name(), raw)? {
      K::validate(raw_key).map_err(|source| Self::key_error(raw_key, source))?;
      V::check(raw_value).map_err(|source| Self::value_error(raw_key, source))?;
    }
    Ok(())
  }

  fn from_json(raw: &Value) -> Result<Self, PatternError> {
    expect_object(Self::type_name(), raw)?
      .iter()
      .map(|(raw_key, raw_value)| -> Result<(K, V), PatternError> {
        let key = K::construct(raw_key)
          .map_err(|source| Self::key_error(raw_key, source))?;
        let value = V::from_json(raw_value)
          .map_err(|source| Self::value_error(raw_key, source))?;
        Ok((key, value))
      })
      .collect()
  }

  fn to_json(&self) -> Value {
    Value::Object(
      self
        .entries
        .iter()
        .map(|(key, value)| (key.as_str().to_owned(), value.to_json()))
        .collect(),
    )
  }

  fn schema() -> Value {
    json!({ "type": "object", "additionalProperties": V::schema() })
  }
}

// ─── JsonObject ──────────────────────────────────────────────────────────────

/// Any JSON object, carried opaquely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonObject(Map<String, Value>);

impl JsonObject {
  pub fn as_map(&self) -> &Map<String, Value> { &self.0 }
}

impl FieldType for JsonObject {
  fn type_name() -> &'static str { "JsonObject" }

  fn check(raw: &Value) -> Result<(), PatternError> {
    expect_object(Self::type_name(), raw).map(|_| ())
  }

  fn from_json(raw: &Value) -> Result<Self, PatternError> {
    expect_object(Self::type_name(), raw).map(|map| Self(map.clone()))
  }

  fn to_json(&self) -> Value { Value::Object(self.0.clone()) }

  fn schema() -> Value { json!({ "type": "object" }) }
}
