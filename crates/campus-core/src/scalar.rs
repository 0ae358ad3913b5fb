//! Plain scalar pattern types.

use base64::{
  Engine as _,
  alphabet,
  engine::{GeneralPurpose, GeneralPurposeConfig},
};

use crate::{
  error::PatternError,
  pattern::{PatternType, grammar, pattern_type},
};

pattern_type! {
  /// Six-digit one-time password, e.g. `123456`.
  Otp = grammar::OTP;
}

pattern_type! {
  /// Free text. Any non-empty string.
  Text = r"[\s\S]+";
}

// ─── Base64String ────────────────────────────────────────────────────────────

/// Standard-alphabet base64 with canonical padding. Non-zero trailing bits
/// are tolerated, so every string matching the grammar decodes and
/// validation needs only the grammar.
static ENGINE: GeneralPurpose = GeneralPurpose::new(
  &alphabet::STANDARD,
  GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

pattern_type! {
  /// Base64-encoded bytes, e.g. a secret hash.
  Base64String =
    "(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{4}|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{2}==)",
    format = "byte";
}

impl Base64String {
  /// Encode `bytes`.
  pub fn encode(bytes: impl AsRef<[u8]>) -> Self { Self(ENGINE.encode(bytes)) }

  pub fn decode(&self) -> Result<Vec<u8>, PatternError> {
    ENGINE.decode(&self.0).map_err(|error| PatternError::OutOfRange {
      type_name: Self::TYPE_NAME,
      value:     self.0.clone(),
      reason:    error.to_string(),
    })
  }
}
