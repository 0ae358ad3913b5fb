//! Core data types for the Campus API client.
//!
//! Two layers live here. The pattern layer ([`pattern`], [`ids`],
//! [`scalar`], [`temporal`]) holds immutable string newtypes that can only be
//! built from input matching their grammar. The model layer ([`field`],
//! [`model`], [`models`]) declares records of those types with per-field
//! visibility classes and validates whole payloads against them.
//!
//! This crate is deliberately free of HTTP dependencies; the transport calls
//! [`model::Model::from_fields`] on response bodies and
//! [`model::Model::validate_request`] before sending request bodies.

pub mod error;
pub mod field;
pub mod ids;
pub mod model;
pub mod models;
pub mod pattern;
pub mod scalar;
pub mod temporal;


pub use error::{
  DefinitionError, Error, FieldFailure, NoSuchField, PatternError, Result,
  ValidationError,
};
pub use field::{AccessValue, FieldType, FieldValue, JsonObject, Mapping, Members};
pub use ids::{
  CampusId, CircleId, ClientId, Domain, EmailAddress, Label, NarrowId, Uid,
  UidKind, UserId,
};
pub use model::{FieldClass, FieldSpec, Model, Record, Schema, SchemaBuilder};
pub use models::{
  Circle, CircleMemberAdd, CircleMemberRemove, CircleMemberSet, CircleNew,
  CircleUpdate, Client, User,
};
pub use pattern::PatternType;
pub use scalar::{Base64String, Otp, Text};
pub use temporal::{Date, DateParts, Datetime, DatetimeParts, Time, TimeParts};
