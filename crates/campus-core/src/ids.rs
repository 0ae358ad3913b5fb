//! Identifier pattern types: user ids, email addresses, labels and the
//! composite `uid-<label>-<uid>` Campus ids.

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::{
  error::PatternError,
  pattern::{
    PatternType, anchored, component, grammar, group, mismatch, pattern_type,
    string_impls,
  },
};

// ─── Email ───────────────────────────────────────────────────────────────────

pattern_type! {
  /// The username part of an email address.
  UserId = grammar::USER_ID;
}

pattern_type! {
  /// The domain part of an email address.
  Domain = grammar::DOMAIN;
}

/// An email address, decomposed into its user id and domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmailAddress {
  raw:     String,
  user_id: UserId,
  domain:  Domain,
}

impl EmailAddress {
  pub fn user_id(&self) -> &UserId { &self.user_id }

  pub fn domain(&self) -> &Domain { &self.domain }
}

impl PatternType for EmailAddress {
  const FORMAT: Option<&'static str> = Some("email");
  const TYPE_NAME: &'static str = "EmailAddress";

  fn pattern() -> &'static Regex {
    static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
      anchored(&format!(
        "(?<user_id>{})@(?<domain>{})",
        grammar::USER_ID,
        grammar::DOMAIN
      ))
    });
    &PATTERN
  }

  fn construct(raw: &str) -> Result<Self, PatternError> {
    let caps = Self::pattern().captures(raw).ok_or_else(|| mismatch::<Self>(raw))?;
    Ok(Self {
      raw:     raw.to_owned(),
      user_id: component::<Self, _>(raw, "user_id", group(&caps, "user_id"))?,
      domain:  component::<Self, _>(raw, "domain", group(&caps, "domain"))?,
    })
  }

  fn as_str(&self) -> &str { &self.raw }
}

string_impls!(EmailAddress);

// ─── Label ───────────────────────────────────────────────────────────────────

pattern_type! {
  /// One to three hyphen-joined lowercase words of 2 to 15 letters, e.g.
  /// `client` or `study-group`.
  Label = grammar::LABEL;
}

impl Label {
  pub fn words(&self) -> impl Iterator<Item = &str> { self.0.split('-') }
}

// ─── Uid ─────────────────────────────────────────────────────────────────────

/// Length class of a [`Uid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UidKind {
  /// 8 characters, for resources of bounded cardinality.
  Short,
  /// 16 characters, for sources, events and other high-volume resources.
  Long,
}

impl UidKind {
  pub fn len(self) -> usize {
    match self {
      Self::Short => 8,
      Self::Long => 16,
    }
  }
}

pattern_type! {
  /// Lowercase alphanumeric unique id of 8 or 16 characters.
  Uid = format!("{}|{}", grammar::UID8, grammar::UID16);
}

impl Uid {
  pub fn kind(&self) -> UidKind {
    if self.0.len() == UidKind::Short.len() {
      UidKind::Short
    } else {
      UidKind::Long
    }
  }

  /// A fresh random uid: the 122 random bits of a v4 UUID, written in base
  /// 36 from the low end.
  pub fn generate(kind: UidKind) -> Self {
    const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut bits = random_bits();
    let raw = (0..kind.len())
      .map(|_| {
        let digit = (bits % 36) as usize;
        bits /= 36;
        char::from(ALPHABET[digit])
      })
      .collect();
    Self(raw)
  }
}

/// The random bits of a v4 UUID, packed low. The version nibble (bits
/// 76..80) and variant bits (62..64) are fixed and dropped.
fn random_bits() -> u128 {
  let value = Uuid::new_v4().as_u128();
  let low = value & ((1 << 62) - 1);
  let middle = (value >> 64) & 0xfff;
  let high = value >> 80;
  low | (middle << 62) | (high << 74)
}

// ─── CampusId ────────────────────────────────────────────────────────────────

/// A namespaced resource id, `uid-<label>-<uid8>`, e.g.
/// `uid-client-1a2b3c4d`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CampusId {
  raw:   String,
  label: Label,
  uid:   Uid,
}

impl CampusId {
  pub fn label(&self) -> &Label { &self.label }

  pub fn uid(&self) -> &Uid { &self.uid }

  /// A fresh id in the `label` namespace.
  pub fn generate(label: &Label) -> Self {
    Self::assemble(label.clone(), Uid::generate(UidKind::Short))
  }

  fn assemble(label: Label, uid: Uid) -> Self {
    Self { raw: format!("uid-{label}-{uid}"), label, uid }
  }

  /// Decompose `raw` using the grammar of `T`, which must capture `label`
  /// and `uid` groups.
  fn decompose<T: PatternType>(raw: &str) -> Result<Self, PatternError> {
    let caps = T::pattern().captures(raw).ok_or_else(|| mismatch::<T>(raw))?;
    Ok(Self {
      raw:   raw.to_owned(),
      label: component::<T, _>(raw, "label", group(&caps, "label"))?,
      uid:   component::<T, _>(raw, "uid", group(&caps, "uid"))?,
    })
  }
}

impl PatternType for CampusId {
  const TYPE_NAME: &'static str = "CampusId";

  fn pattern() -> &'static Regex {
    static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
      anchored(&format!(
        "uid-(?<label>{})-(?<uid>{})",
        grammar::LABEL,
        grammar::UID8
      ))
    });
    &PATTERN
  }

  fn construct(raw: &str) -> Result<Self, PatternError> { Self::decompose::<Self>(raw) }

  fn as_str(&self) -> &str { &self.raw }
}

string_impls!(CampusId);

// ─── Narrowed ids ────────────────────────────────────────────────────────────

/// A [`CampusId`] whose label is fixed to [`LABEL`](Self::LABEL).
///
/// Every narrowed id is also a valid `CampusId`; the reverse holds only when
/// the label matches.
pub trait NarrowId: PatternType + Into<CampusId> + TryFrom<CampusId> {
  const LABEL: &'static str;

  fn as_campus_id(&self) -> &CampusId;

  /// A fresh random id in this namespace.
  fn generate() -> Self;
}

macro_rules! narrow_id {
  ($(#[$meta:meta])* $ty:ident, $label:literal) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ty(CampusId);

    impl $ty {
      pub fn label(&self) -> &Label { self.0.label() }

      pub fn uid(&self) -> &Uid { self.0.uid() }
    }

    impl PatternType for $ty {
      const TYPE_NAME: &'static str = stringify!($ty);

      fn pattern() -> &'static Regex {
        static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
          anchored(&format!(
            "uid-(?<label>{})-(?<uid>{})",
            $label,
            grammar::UID8
          ))
        });
        &PATTERN
      }

      fn construct(raw: &str) -> Result<Self, PatternError> {
        CampusId::decompose::<Self>(raw).map(Self)
      }

      fn as_str(&self) -> &str { self.0.as_str() }
    }

    impl NarrowId for $ty {
      const LABEL: &'static str = $label;

      fn as_campus_id(&self) -> &CampusId { &self.0 }

      fn generate() -> Self {
        Self(CampusId::assemble(
          Label($label.to_owned()),
          Uid::generate(UidKind::Short),
        ))
      }
    }

    impl From<$ty> for CampusId {
      fn from(id: $ty) -> Self { id.0 }
    }

    impl TryFrom<CampusId> for $ty {
      type Error = PatternError;

      fn try_from(id: CampusId) -> Result<Self, Self::Error> {
        if id.label().as_str() == $label {
          Ok(Self(id))
        } else {
          Err(mismatch::<Self>(id.as_str()))
        }
      }
    }

    string_impls!($ty);
  };
}

narrow_id! {
  /// Id of an API client, `uid-client-<uid8>`.
  ClientId, "client"
}

narrow_id! {
  /// Id of a circle, `uid-circle-<uid8>`.
  CircleId, "circle"
}
