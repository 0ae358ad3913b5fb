//! Declarative models: schemas, records and the two validation passes.
//!
//! A [`Schema`] is an ordered list of fields, each with a [`FieldType`] and a
//! set of [`FieldClass`]es. It is built once per model type; conflicting
//! classes are rejected by [`SchemaBuilder::build`].
//!
//! Two entry points check caller data against a schema:
//!
//! - [`Schema::construct`] materialises a full payload (a server response)
//!   into a [`Record`]. Every declared field except hidden ones must be
//!   present, and every field failure is reported at once.
//! - [`Schema::validate_request`] checks a partial payload before it is sent.
//!   Hidden and response-only fields are refused, absent optional fields are
//!   fine, and the first failure is reported.

use serde_json::{Map, Value, json};
use strum::Display;

use crate::{
  error::{DefinitionError, FieldFailure, NoSuchField, PatternError, ValidationError},
  field::{FieldType, FieldValue, json_kind},
};

// ─── Field classes ───────────────────────────────────────────────────────────

/// Visibility and requirement classes a field can be declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FieldClass {
  /// Never accepted from a caller, never emitted.
  Hidden,
  /// Accepted in requests, never emitted.
  RequestOnly,
  /// Server-assigned; refused in requests, always present in responses.
  ResponseOnly,
  /// Must be present in every request.
  Required,
}

/// Pairs of classes a single field may not combine.
const FORBIDDEN: [(FieldClass, FieldClass); 5] = [
  (FieldClass::Hidden, FieldClass::RequestOnly),
  (FieldClass::Hidden, FieldClass::ResponseOnly),
  (FieldClass::RequestOnly, FieldClass::ResponseOnly),
  (FieldClass::Required, FieldClass::ResponseOnly),
  (FieldClass::Required, FieldClass::Hidden),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Classes {
  hidden:        bool,
  request_only:  bool,
  response_only: bool,
  required:      bool,
}

impl Classes {
  fn has(&self, class: FieldClass) -> bool {
    match class {
      FieldClass::Hidden => self.hidden,
      FieldClass::RequestOnly => self.request_only,
      FieldClass::ResponseOnly => self.response_only,
      FieldClass::Required => self.required,
    }
  }

  fn insert(&mut self, class: FieldClass) {
    match class {
      FieldClass::Hidden => self.hidden = true,
      FieldClass::RequestOnly => self.request_only = true,
      FieldClass::ResponseOnly => self.response_only = true,
      FieldClass::Required => self.required = true,
    }
  }

  fn conflict(&self) -> Option<(FieldClass, FieldClass)> {
    FORBIDDEN
      .into_iter()
      .find(|(first, second)| self.has(*first) && self.has(*second))
  }
}

// ─── Field spec ──────────────────────────────────────────────────────────────

/// One declared field: its name, its type's entry points and its classes.
#[derive(Debug, Clone)]
pub struct FieldSpec {
  name:      &'static str,
  type_name: &'static str,
  check:     fn(&Value) -> Result<(), PatternError>,
  construct: fn(&Value) -> Result<Box<dyn FieldValue>, PatternError>,
  schema:    fn() -> Value,
  classes:   Classes,
}

fn construct_boxed<T: FieldType>(raw: &Value) -> Result<Box<dyn FieldValue>, PatternError> {
  T::from_json(raw).map(|value| Box::new(value) as Box<dyn FieldValue>)
}

impl FieldSpec {
  fn new<T: FieldType>(name: &'static str) -> Self {
    Self {
      name,
      type_name: T::type_name(),
      check: T::check,
      construct: construct_boxed::<T>,
      schema: T::schema,
      classes: Classes::default(),
    }
  }

  pub fn name(&self) -> &'static str { self.name }

  pub fn type_name(&self) -> &'static str { self.type_name }

  pub fn is(&self, class: FieldClass) -> bool { self.classes.has(class) }

  /// Emitted by [`Record::to_json`].
  pub fn is_visible(&self) -> bool {
    !(self.classes.hidden || self.classes.request_only)
  }

  /// Check a raw value against this field's type.
  pub fn check(&self, raw: &Value) -> Result<(), PatternError> { (self.check)(raw) }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Collects field declarations and classes for a [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
  model:   &'static str,
  fields:  Vec<FieldSpec>,
  classes: Vec<(FieldClass, &'static str)>,
}

impl SchemaBuilder {
  /// Declare a field of type `T`. Declaration order is preserved.
  pub fn field<T: FieldType>(mut self, name: &'static str) -> Self {
    self.fields.push(FieldSpec::new::<T>(name));
    self
  }

  pub fn hidden(self, names: &[&'static str]) -> Self {
    self.classify(FieldClass::Hidden, names)
  }

  pub fn request_only(self, names: &[&'static str]) -> Self {
    self.classify(FieldClass::RequestOnly, names)
  }

  pub fn response_only(self, names: &[&'static str]) -> Self {
    self.classify(FieldClass::ResponseOnly, names)
  }

  pub fn required(self, names: &[&'static str]) -> Self {
    self.classify(FieldClass::Required, names)
  }

  fn classify(mut self, class: FieldClass, names: &[&'static str]) -> Self {
    self.classes.extend(names.iter().map(|name| (class, *name)));
    self
  }

  /// Resolve classes onto fields and reject inconsistent declarations.
  pub fn build(self) -> Result<Schema, DefinitionError> {
    let Self { model, mut fields, classes } = self;

    for (index, spec) in fields.iter().enumerate() {
      if fields.iter().take(index).any(|earlier| earlier.name == spec.name) {
        return Err(DefinitionError::DuplicateField { model, field: spec.name });
      }
    }

    for (class, name) in classes {
      let spec = fields
        .iter_mut()
        .find(|spec| spec.name == name)
        .ok_or(DefinitionError::UndeclaredField { model, field: name, class })?;
      spec.classes.insert(class);
    }

    for spec in &fields {
      if let Some((first, second)) = spec.classes.conflict() {
        return Err(DefinitionError::Conflict {
          model,
          field: spec.name,
          first,
          second,
        });
      }
    }

    tracing::debug!(model, fields = fields.len(), "built model schema");
    Ok(Schema { name: model, fields })
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// The field layout and visibility rules of one model type.
#[derive(Debug)]
pub struct Schema {
  name:   &'static str,
  fields: Vec<FieldSpec>,
}

impl Schema {
  pub fn builder(model: &'static str) -> SchemaBuilder {
    SchemaBuilder { model, fields: Vec::new(), classes: Vec::new() }
  }

  pub fn name(&self) -> &'static str { self.name }

  /// Declared fields in declaration order.
  pub fn fields(&self) -> &[FieldSpec] { &self.fields }

  pub fn field(&self, name: &str) -> Option<&FieldSpec> {
    self.fields.iter().find(|spec| spec.name == name)
  }

  pub fn is_hidden(&self, name: &str) -> bool { self.has(name, FieldClass::Hidden) }

  pub fn is_request_only(&self, name: &str) -> bool {
    self.has(name, FieldClass::RequestOnly)
  }

  pub fn is_response_only(&self, name: &str) -> bool {
    self.has(name, FieldClass::ResponseOnly)
  }

  pub fn is_required(&self, name: &str) -> bool { self.has(name, FieldClass::Required) }

  fn has(&self, name: &str, class: FieldClass) -> bool {
    self.field(name).is_some_and(|spec| spec.is(class))
  }

  /// Borrow `value` as a JSON object.
  pub fn object<'a>(&self, value: &'a Value) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::NotAnObject {
      model: self.name,
      found: json_kind(value),
    })
  }

  /// Materialise a full payload into a [`Record`].
  ///
  /// Unknown keys and missing keys are each reported as one error listing
  /// every offending name; field values are then checked and all failures
  /// are reported together.
  pub fn construct(&'static self, values: &Map<String, Value>) -> Result<Record, ValidationError> {
    self
      .construct_inner(values)
      .inspect(|_| tracing::trace!(model = self.name, "constructed record"))
      .inspect_err(|error| tracing::debug!(model = self.name, %error, "rejected payload"))
  }

  fn construct_inner(
    &'static self,
    values: &Map<String, Value>,
  ) -> Result<Record, ValidationError> {
    let unknown: Vec<String> = values
      .keys()
      .filter(|key| self.field(key).is_none())
      .cloned()
      .collect();
    if !unknown.is_empty() {
      return Err(ValidationError::UnknownFields { model: self.name, fields: unknown });
    }

    let missing: Vec<String> = self
      .fields
      .iter()
      .filter(|spec| !spec.classes.hidden && !values.contains_key(spec.name))
      .map(|spec| spec.name.to_owned())
      .collect();
    if !missing.is_empty() {
      return Err(ValidationError::MissingFields { model: self.name, fields: missing });
    }

    let failures: Vec<FieldFailure> = self
      .present(values)
      .filter_map(|(spec, raw)| {
        spec.check(raw).err().map(|error| FieldFailure {
          field: spec.name.to_owned(),
          error,
        })
      })
      .collect();
    if !failures.is_empty() {
      return Err(ValidationError::InvalidFields { model: self.name, failures });
    }

    let values = self
      .present(values)
      .map(|(spec, raw)| {
        (spec.construct)(raw)
          .map(|value| (spec.name, value))
          .map_err(|source| ValidationError::InvalidField {
            model: self.name,
            field: spec.name.to_owned(),
            source,
          })
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Record { schema: self, values })
  }

  /// Declared fields present in `values`, in declaration order.
  fn present<'a>(
    &'a self,
    values: &'a Map<String, Value>,
  ) -> impl Iterator<Item = (&'a FieldSpec, &'a Value)> {
    self
      .fields
      .iter()
      .filter_map(|spec| values.get(spec.name).map(|raw| (spec, raw)))
  }

  /// Check a partial request payload.
  pub fn validate_request(&self, payload: &Map<String, Value>) -> Result<(), ValidationError> {
    self
      .validate_request_inner(payload)
      .inspect(|_| tracing::trace!(model = self.name, "request payload accepted"))
      .inspect_err(|error| tracing::debug!(model = self.name, %error, "rejected request payload"))
  }

  fn validate_request_inner(&self, payload: &Map<String, Value>) -> Result<(), ValidationError> {
    let model = self.name;
    let mut remaining: Vec<&'static str> = self
      .fields
      .iter()
      .filter(|spec| spec.classes.required)
      .map(|spec| spec.name)
      .collect();

    for (key, raw) in payload {
      let spec = self.field(key).ok_or_else(|| ValidationError::UnknownField {
        model,
        field: key.clone(),
        value: raw.clone(),
      })?;
      if spec.classes.hidden {
        return Err(ValidationError::HiddenField {
          model,
          field: key.clone(),
          value: raw.clone(),
        });
      }
      if spec.classes.response_only {
        return Err(ValidationError::ResponseOnlyField {
          model,
          field: key.clone(),
          value: raw.clone(),
        });
      }
      remaining.retain(|name| *name != spec.name);
      spec.check(raw).map_err(|source| ValidationError::InvalidField {
        model,
        field: key.clone(),
        source,
      })?;
    }

    if remaining.is_empty() {
      Ok(())
    } else {
      Err(ValidationError::MissingRequired {
        model,
        fields: remaining.into_iter().map(str::to_owned).collect(),
      })
    }
  }

  /// OpenAPI 3.0 object schema. Hidden fields are omitted; response-only
  /// fields are `readOnly` and request-only fields `writeOnly`.
  pub fn json_schema(&self) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for spec in self.fields.iter().filter(|spec| !spec.classes.hidden) {
      let mut schema = (spec.schema)();
      if let Some(object) = schema.as_object_mut() {
        if spec.classes.response_only {
          object.insert("readOnly".into(), Value::Bool(true));
        }
        if spec.classes.request_only {
          object.insert("writeOnly".into(), Value::Bool(true));
        }
      }
      properties.insert(spec.name.to_owned(), schema);
      if spec.classes.required {
        required.push(spec.name);
      }
    }

    let mut schema = json!({
      "title":      self.name,
      "type":       "object",
      "properties": properties,
    });
    if !required.is_empty()
      && let Some(object) = schema.as_object_mut()
    {
      object.insert("required".into(), json!(required));
    }
    schema
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A constructed model instance: field name to typed value, in declaration
/// order. Immutable once built.
#[derive(Debug, Clone)]
pub struct Record {
  schema: &'static Schema,
  values: Vec<(&'static str, Box<dyn FieldValue>)>,
}

impl Record {
  pub fn schema(&self) -> &'static Schema { self.schema }

  /// Look up a field by name. Undeclared names and absent hidden fields are
  /// [`NoSuchField`].
  pub fn get(&self, field: &str) -> Result<&dyn FieldValue, NoSuchField> {
    self
      .values
      .iter()
      .find(|(name, _)| *name == field)
      .map(|(_, value)| value.as_ref())
      .ok_or_else(|| NoSuchField { model: self.schema.name, field: field.to_owned() })
  }

  /// Typed lookup; `None` if absent or of another type.
  pub fn get_as<T: FieldType>(&self, field: &str) -> Option<&T> {
    self.get(field).ok().and_then(|value| value.downcast_ref::<T>())
  }

  /// Present fields in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &dyn FieldValue)> {
    self.values.iter().map(|(name, value)| (*name, value.as_ref()))
  }

  /// The wire projection: every present field except hidden and request-only
  /// ones.
  pub fn to_json(&self) -> Map<String, Value> {
    self
      .values
      .iter()
      .filter(|(name, _)| self.schema.field(name).is_some_and(FieldSpec::is_visible))
      .map(|(name, value)| ((*name).to_owned(), value.json()))
      .collect()
  }

  /// Equal JSON projections.
  pub fn visible_eq(&self, other: &Self) -> bool { self.to_json() == other.to_json() }
}

impl PartialEq for Record {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::eq(self.schema, other.schema)
      && self.values.len() == other.values.len()
      && self
        .values
        .iter()
        .zip(&other.values)
        .all(|((a_name, a), (b_name, b))| a_name == b_name && **a == **b)
  }
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// A record type with a fixed schema. Implement with [`campus_model!`].
///
/// [`campus_model!`]: crate::campus_model
pub trait Model: Sized {
  /// The model's schema, built on first use.
  fn schema() -> &'static Schema;

  fn from_record(record: Record) -> Self;

  fn record(&self) -> &Record;

  /// Materialise a full payload, e.g. a response body.
  fn from_fields(values: &Map<String, Value>) -> Result<Self, ValidationError> {
    Self::schema().construct(values).map(Self::from_record)
  }

  /// [`from_fields`](Self::from_fields) for an arbitrary JSON value.
  fn from_value(value: &Value) -> Result<Self, ValidationError> {
    let schema = Self::schema();
    schema.construct(schema.object(value)?).map(Self::from_record)
  }

  /// Check a partial request payload before it is sent.
  fn validate_request(payload: &Map<String, Value>) -> Result<(), ValidationError> {
    Self::schema().validate_request(payload)
  }

  /// [`validate_request`](Self::validate_request) for an arbitrary JSON
  /// value.
  fn validate_request_value(payload: &Value) -> Result<(), ValidationError> {
    let schema = Self::schema();
    schema.validate_request(schema.object(payload)?)
  }

  /// Parse a JSON document and materialise it.
  fn from_json_str(raw: &str) -> crate::Result<Self> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(Self::from_value(&value)?)
  }

  /// Parse a JSON document and check it as a request payload. Returns the
  /// accepted object.
  fn validate_request_str(raw: &str) -> crate::Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw)?;
    let payload = Self::schema().object(&value)?;
    Self::validate_request(payload)?;
    Ok(payload.clone())
  }

  /// The wire projection used as a request body.
  fn to_json(&self) -> Map<String, Value> { self.record().to_json() }

  fn get(&self, field: &str) -> Result<&dyn FieldValue, NoSuchField> {
    self.record().get(field)
  }
}

/// Declare a model type: a [`Record`] newtype with a lazily built schema and
/// a typed accessor per field.
///
/// ```
/// use campus_core::{campus_model, EmailAddress, Model, Text};
///
/// campus_model! {
///   /// A contact.
///   pub struct Contact {
///     email: EmailAddress,
///     note:  Text,
///   }
///   hidden:        [],
///   request_only:  [note],
///   response_only: [],
///   required:      [email],
/// }
///
/// let payload = serde_json::json!({ "email": "x@y.com" });
/// assert!(Contact::validate_request_value(&payload).is_ok());
/// ```
///
/// # Panics
///
/// The first use of the model panics if its declaration is inconsistent;
/// see [`DefinitionError`].
#[macro_export]
macro_rules! campus_model {
  (
    $(#[$meta:meta])*
    $vis:vis struct $name:ident {
      $($field:ident : $ty:ty),+ $(,)?
    }
    hidden:        [$($hidden:ident),* $(,)?],
    request_only:  [$($request_only:ident),* $(,)?],
    response_only: [$($response_only:ident),* $(,)?],
    required:      [$($required:ident),* $(,)?] $(,)?
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq)]
    $vis struct $name($crate::model::Record);

    impl $name {
      $(
        pub fn $field(&self) -> Option<&$ty> {
          self.0.get_as::<$ty>(stringify!($field))
        }
      )+
    }

    impl $crate::model::Model for $name {
      fn schema() -> &'static $crate::model::Schema {
        static SCHEMA: ::std::sync::LazyLock<$crate::model::Schema> =
          ::std::sync::LazyLock::new(|| {
            $crate::model::Schema::builder(stringify!($name))
              $(.field::<$ty>(stringify!($field)))+
              .hidden(&[$(stringify!($hidden)),*])
              .request_only(&[$(stringify!($request_only)),*])
              .response_only(&[$(stringify!($response_only)),*])
              .required(&[$(stringify!($required)),*])
              .build()
              .unwrap_or_else(|error| panic!("invalid model definition: {error}"))
          });
        &SCHEMA
      }

      fn from_record(record: $crate::model::Record) -> Self { Self(record) }

      fn record(&self) -> &$crate::model::Record { &self.0 }
    }
  };
}

#[cfg(test)]
mod tests {
  use std::sync::LazyLock;

  use serde_json::json;

  use super::*;
  use crate::{
    ids::{EmailAddress, UserId},
    scalar::{Base64String, Text},
  };

  fn object(value: Value) -> Map<String, Value> {
    match value {
      Value::Object(map) => map,
      other => panic!("not an object: {other}"),
    }
  }

  /// A schema exercising every class.
  static ACCOUNT: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Account")
      .field::<UserId>("id")
      .field::<EmailAddress>("email")
      .field::<Text>("password")
      .field::<Base64String>("token")
      .response_only(&["id"])
      .request_only(&["password"])
      .hidden(&["token"])
      .required(&["email"])
      .build()
      .unwrap()
  });

  fn conflict(builder: SchemaBuilder) -> (FieldClass, FieldClass) {
    match builder.build() {
      Err(DefinitionError::Conflict { first, second, field, .. }) => {
        assert_eq!(field, "x");
        (first, second)
      }
      other => panic!("expected a conflict, got {other:?}"),
    }
  }

  fn one_field() -> SchemaBuilder { Schema::builder("Bad").field::<Text>("x") }

  #[test]
  fn hidden_and_request_only_conflict() {
    let pair = conflict(one_field().hidden(&["x"]).request_only(&["x"]));
    assert_eq!(pair, (FieldClass::Hidden, FieldClass::RequestOnly));
  }

  #[test]
  fn hidden_and_response_only_conflict() {
    let pair = conflict(one_field().hidden(&["x"]).response_only(&["x"]));
    assert_eq!(pair, (FieldClass::Hidden, FieldClass::ResponseOnly));
  }

  #[test]
  fn required_and_response_only_conflict() {
    let pair = conflict(one_field().response_only(&["x"]).required(&["x"]));
    assert_eq!(pair, (FieldClass::Required, FieldClass::ResponseOnly));
  }

  #[test]
  fn required_and_hidden_conflict() {
    let pair = conflict(one_field().hidden(&["x"]).required(&["x"]));
    assert_eq!(pair, (FieldClass::Required, FieldClass::Hidden));
  }

  #[test]
  fn request_only_and_response_only_conflict() {
    let pair = conflict(one_field().request_only(&["x"]).response_only(&["x"]));
    assert_eq!(pair, (FieldClass::RequestOnly, FieldClass::ResponseOnly));
  }

  #[test]
  fn conflict_message_names_field_and_classes() {
    let error = one_field().hidden(&["x"]).required(&["x"]).build().unwrap_err();
    assert_eq!(error.to_string(), "Bad.x cannot be both required and hidden");
  }

  #[test]
  fn duplicate_and_undeclared_fields_are_rejected() {
    let duplicate = one_field().field::<Text>("x").build().unwrap_err();
    assert!(matches!(duplicate, DefinitionError::DuplicateField { field: "x", .. }));

    let undeclared = one_field().required(&["y"]).build().unwrap_err();
    assert!(matches!(
      undeclared,
      DefinitionError::UndeclaredField { field: "y", class: FieldClass::Required, .. }
    ));
  }

  #[test]
  fn classes_are_queryable() {
    assert!(ACCOUNT.is_response_only("id"));
    assert!(ACCOUNT.is_request_only("password"));
    assert!(ACCOUNT.is_hidden("token"));
    assert!(ACCOUNT.is_required("email"));
    assert!(!ACCOUNT.is_required("missing"));
    let names: Vec<_> = ACCOUNT.fields().iter().map(FieldSpec::name).collect();
    assert_eq!(names, ["id", "email", "password", "token"]);
  }

  #[test]
  fn construct_lists_every_unknown_field() {
    let values = object(json!({ "a": 1, "b": 2, "email": "x@y.com" }));
    let Err(ValidationError::UnknownFields { fields, .. }) = ACCOUNT.construct(&values) else {
      panic!("expected unknown fields");
    };
    assert_eq!(fields, ["a", "b"]);
  }

  #[test]
  fn construct_lists_every_missing_field_except_hidden() {
    let values = object(json!({ "email": "x@y.com" }));
    let Err(ValidationError::MissingFields { fields, .. }) = ACCOUNT.construct(&values) else {
      panic!("expected missing fields");
    };
    assert_eq!(fields, ["id", "password"]);
  }

  #[test]
  fn construct_accumulates_every_invalid_field() {
    let values = object(json!({
      "id":       "not an id",
      "email":    "nope",
      "password": "hunter2",
    }));
    let Err(ValidationError::InvalidFields { failures, .. }) = ACCOUNT.construct(&values) else {
      panic!("expected invalid fields");
    };
    let fields: Vec<_> = failures.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, ["id", "email"]);
    assert!(matches!(failures[1].error, PatternError::Mismatch { type_name: "EmailAddress", .. }));
  }

  #[test]
  fn construct_accepts_hidden_fields_but_never_emits_them() {
    let values = object(json!({
      "id":       "alice",
      "email":    "alice@school.edu",
      "password": "hunter2",
      "token":    "c2VjcmV0",
    }));
    let record = ACCOUNT.construct(&values).unwrap();
    assert_eq!(record.get_as::<Base64String>("token").unwrap().as_ref(), "c2VjcmV0");
    let json = record.to_json();
    assert!(!json.contains_key("token"));
    assert!(!json.contains_key("password"));
    assert_eq!(json["id"], "alice");
    assert_eq!(json["email"], "alice@school.edu");
  }

  #[test]
  fn get_distinguishes_missing_fields() {
    let values = object(json!({
      "id":       "alice",
      "email":    "alice@school.edu",
      "password": "hunter2",
    }));
    let record = ACCOUNT.construct(&values).unwrap();
    assert_eq!(record.get("email").unwrap().to_string(), "alice@school.edu");
    assert_eq!(record.get("email").unwrap().kind(), "EmailAddress");
    let error = record.get("nickname").unwrap_err();
    assert_eq!(error.to_string(), "Account.nickname: no such field");
    assert!(record.get("token").is_err());
    assert!(record.get_as::<Text>("email").is_none());
  }

  #[test]
  fn request_refuses_hidden_and_response_only_fields() {
    let hidden = object(json!({ "email": "x@y.com", "token": "c2VjcmV0" }));
    assert_eq!(
      ACCOUNT.validate_request(&hidden),
      Err(ValidationError::HiddenField {
        model: "Account",
        field: "token".into(),
        value: json!("c2VjcmV0"),
      })
    );
    let response_only = object(json!({ "email": "x@y.com", "id": "alice" }));
    assert_eq!(
      ACCOUNT.validate_request(&response_only),
      Err(ValidationError::ResponseOnlyField {
        model: "Account",
        field: "id".into(),
        value: json!("alice"),
      })
    );
    let unknown = object(json!({ "email": "x@y.com", "nickname": 7 }));
    let error = ACCOUNT.validate_request(&unknown).unwrap_err();
    assert_eq!(error, ValidationError::UnknownField {
      model: "Account",
      field: "nickname".into(),
      value: json!(7),
    });
    assert_eq!(error.to_string(), "Account: unknown field: nickname (got 7)");
  }

  #[test]
  fn request_tolerates_missing_optional_fields() {
    assert!(ACCOUNT.validate_request(&object(json!({ "email": "x@y.com" }))).is_ok());
    let Err(ValidationError::MissingRequired { fields, .. }) =
      ACCOUNT.validate_request(&object(json!({ "password": "hunter2" })))
    else {
      panic!("expected missing required");
    };
    assert_eq!(fields, ["email"]);
  }

  #[test]
  fn request_reports_field_rule_and_value() {
    let error = ACCOUNT
      .validate_request(&object(json!({ "email": "x@y" })))
      .unwrap_err();
    let ValidationError::InvalidField { field, source, .. } = &error else {
      panic!("expected an invalid field");
    };
    assert_eq!(field, "email");
    assert!(matches!(source, PatternError::Mismatch { value, .. } if value == "x@y"));
    assert!(error.to_string().starts_with("Account.email: EmailAddress"));
  }

  #[test]
  fn object_payloads_only() {
    assert!(matches!(
      ACCOUNT.object(&json!([1, 2])),
      Err(ValidationError::NotAnObject { found: "array", .. })
    ));
  }

  #[test]
  fn json_schema_marks_visibility() {
    let schema = ACCOUNT.json_schema();
    assert_eq!(schema["title"], "Account");
    assert_eq!(schema["required"], json!(["email"]));
    assert_eq!(schema["properties"]["id"]["readOnly"], true);
    assert_eq!(schema["properties"]["password"]["writeOnly"], true);
    assert_eq!(schema["properties"]["email"]["format"], "email");
    assert!(schema["properties"].get("token").is_none());
  }
}
