//! The pattern-type contract and the grammar fragments it is built from.
//!
//! A pattern type is an immutable newtype over a `String` that can only be
//! obtained through [`PatternType::construct`]. Every grammar is anchored at
//! both ends and compiled once per process.

use std::hash::Hash;

use regex::{Captures, Regex};
use serde_json::{Value, json};

use crate::error::PatternError;

// ─── Grammar fragments ───────────────────────────────────────────────────────

/// Unanchored building blocks shared by the pattern types. Alternations are
/// wrapped in non-capturing groups so fragments compose safely.
pub mod grammar {
  /// Lowercase word of 2 to 15 letters.
  pub const LOWER_WORD: &str = "[a-z]{2,15}";
  /// One to three hyphen-joined lowercase words.
  pub const LABEL: &str = "[a-z]{2,15}(?:-[a-z]{2,15}){0,2}";
  pub const USER_ID: &str = "[a-zA-Z0-9._-]{1,64}";
  pub const DOMAIN: &str = r"[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";
  pub const UID8: &str = "[a-z0-9]{8}";
  pub const UID16: &str = "[a-z0-9]{16}";
  pub const OTP: &str = "[0-9]{6}";

  // RFC 3339 section 5.6 subset, as used by OpenAPI 3.0.
  pub const YEAR: &str = "[0-9]{4}";
  pub const MONTH: &str = "(?:0[1-9]|1[0-2])";
  pub const DAY: &str = "(?:0[1-9]|[12][0-9]|3[01])";
  pub const HOUR: &str = "(?:[01][0-9]|2[0-3])";
  pub const MINUTE: &str = "[0-5][0-9]";
  pub const SECOND: &str = "[0-5][0-9]";
}

/// Compile `body` anchored at both ends.
///
/// Grammars are constants of this crate, so a compile failure is a bug here
/// rather than bad input.
pub(crate) fn anchored(body: &str) -> Regex {
  let pattern = format!("^(?:{body})$");
  Regex::new(&pattern)
    .unwrap_or_else(|error| panic!("pattern {pattern:?} failed to compile: {error}"))
}

// ─── Contract ────────────────────────────────────────────────────────────────

/// A self-validating scalar backed by a string grammar.
///
/// Equality, ordering and hashing are by the underlying string. Values of
/// different pattern types never compare equal, even when their strings do.
pub trait PatternType:
  Sized + Clone + std::fmt::Debug + std::fmt::Display + Eq + Ord + Hash + Send + Sync + 'static
{
  /// Name used in errors and schemas.
  const TYPE_NAME: &'static str;

  /// OpenAPI `format` for the string, where one is defined.
  const FORMAT: Option<&'static str> = None;

  /// The compiled, anchored grammar.
  fn pattern() -> &'static Regex;

  /// Check `raw` without building an instance. Succeeds iff
  /// [`construct`](Self::construct) would.
  fn validate(raw: &str) -> Result<(), PatternError> {
    if Self::pattern().is_match(raw) {
      Ok(())
    } else {
      Err(mismatch::<Self>(raw))
    }
  }

  /// Parse `raw`, decomposing it into sub-values where the type has any.
  fn construct(raw: &str) -> Result<Self, PatternError>;

  /// The canonical string this value was built from.
  fn as_str(&self) -> &str;

  /// OpenAPI 3.0 schema fragment describing the wire form.
  fn json_schema() -> Value {
    let mut schema = json!({
      "type":    "string",
      "pattern": Self::pattern().as_str(),
    });
    if let (Some(format), Some(object)) = (Self::FORMAT, schema.as_object_mut()) {
      object.insert("format".into(), Value::String(format.into()));
    }
    schema
  }
}

// ─── Helpers for implementors ────────────────────────────────────────────────

pub(crate) fn mismatch<T: PatternType>(raw: &str) -> PatternError {
  PatternError::Mismatch {
    type_name: T::TYPE_NAME,
    pattern:   T::pattern().as_str(),
    value:     raw.to_owned(),
  }
}

/// The text of a named capture group; empty if it did not participate.
pub(crate) fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
  caps.name(name).map_or("", |m| m.as_str())
}

/// Construct sub-value `Inner` from `part`, attributing a failure to the
/// `component` of `Outer`.
pub(crate) fn component<Outer: PatternType, Inner: PatternType>(
  raw: &str,
  component: &'static str,
  part: &str,
) -> Result<Inner, PatternError> {
  Inner::construct(part).map_err(|source| PatternError::Component {
    type_name: Outer::TYPE_NAME,
    component,
    value: raw.to_owned(),
    source: Box::new(source),
  })
}

/// Std, serde and [`FieldType`](crate::field::FieldType) plumbing shared by
/// every pattern type. Expects `PatternType` to be implemented already.
macro_rules! string_impls {
  ($ty:ident) => {
    impl ::std::fmt::Display for $ty {
      fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        f.write_str($crate::pattern::PatternType::as_str(self))
      }
    }

    impl AsRef<str> for $ty {
      fn as_ref(&self) -> &str { $crate::pattern::PatternType::as_str(self) }
    }

    impl ::std::str::FromStr for $ty {
      type Err = $crate::error::PatternError;

      fn from_str(raw: &str) -> Result<Self, Self::Err> {
        <Self as $crate::pattern::PatternType>::construct(raw)
      }
    }

    impl TryFrom<&str> for $ty {
      type Error = $crate::error::PatternError;

      fn try_from(raw: &str) -> Result<Self, Self::Error> {
        <Self as $crate::pattern::PatternType>::construct(raw)
      }
    }

    impl TryFrom<String> for $ty {
      type Error = $crate::error::PatternError;

      fn try_from(raw: String) -> Result<Self, Self::Error> {
        <Self as $crate::pattern::PatternType>::construct(&raw)
      }
    }

    impl From<$ty> for String {
      fn from(value: $ty) -> Self {
        $crate::pattern::PatternType::as_str(&value).to_owned()
      }
    }

    impl ::serde::Serialize for $ty {
      fn serialize<S: ::serde::Serializer>(
        &self,
        serializer: S,
      ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str($crate::pattern::PatternType::as_str(self))
      }
    }

    impl<'de> ::serde::Deserialize<'de> for $ty {
      fn deserialize<D: ::serde::Deserializer<'de>>(
        deserializer: D,
      ) -> Result<Self, D::Error> {
        let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
        <Self as $crate::pattern::PatternType>::construct(&raw)
          .map_err(::serde::de::Error::custom)
      }
    }

    impl $crate::field::FieldType for $ty {
      fn type_name() -> &'static str {
        <Self as $crate::pattern::PatternType>::TYPE_NAME
      }

      fn check(
        raw: &::serde_json::Value,
      ) -> Result<(), $crate::error::PatternError> {
        <Self as $crate::pattern::PatternType>::validate(
          $crate::field::expect_str::<Self>(raw)?,
        )
      }

      fn from_json(
        raw: &::serde_json::Value,
      ) -> Result<Self, $crate::error::PatternError> {
        <Self as $crate::pattern::PatternType>::construct(
          $crate::field::expect_str::<Self>(raw)?,
        )
      }

      fn to_json(&self) -> ::serde_json::Value {
        ::serde_json::Value::String(
          $crate::pattern::PatternType::as_str(self).to_owned(),
        )
      }

      fn schema() -> ::serde_json::Value {
        <Self as $crate::pattern::PatternType>::json_schema()
      }
    }
  };
}

/// A plain pattern type: a `String` newtype with no sub-values.
macro_rules! pattern_type {
  (
    $(#[$meta:meta])*
    $ty:ident = $body:expr $(, format = $format:literal)? ;
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ty(String);

    impl $crate::pattern::PatternType for $ty {
      const TYPE_NAME: &'static str = stringify!($ty);
      $(const FORMAT: Option<&'static str> = Some($format);)?

      fn pattern() -> &'static ::regex::Regex {
        static PATTERN: ::std::sync::LazyLock<::regex::Regex> =
          ::std::sync::LazyLock::new(|| $crate::pattern::anchored(&$body));
        &PATTERN
      }

      fn construct(raw: &str) -> Result<Self, $crate::error::PatternError> {
        <Self as $crate::pattern::PatternType>::validate(raw)?;
        Ok(Self(raw.to_owned()))
      }

      fn as_str(&self) -> &str { &self.0 }
    }

    $crate::pattern::string_impls!($ty);
  };
}

pub(crate) use pattern_type;
pub(crate) use string_impls;
