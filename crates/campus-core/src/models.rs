//! Campus API models.

use crate::{
  campus_model,
  field::{AccessValue, JsonObject, Mapping, Members},
  ids::{CampusId, CircleId, ClientId, EmailAddress, Label, UserId},
  scalar::{Base64String, Text},
  temporal::Datetime,
};

// ─── Accounts ────────────────────────────────────────────────────────────────

campus_model! {
  /// A Campus user account.
  pub struct User {
    id:           UserId,
    email:        EmailAddress,
    name:         Text,
    activated_at: Datetime,
  }
  hidden:        [],
  request_only:  [],
  response_only: [id, activated_at],
  required:      [email, name],
}

campus_model! {
  /// An API client registered with Campus.
  pub struct Client {
    id:          ClientId,
    name:        Label,
    description: Text,
    created_at:  Datetime,
    secret_hash: Base64String,
  }
  hidden:        [secret_hash],
  request_only:  [],
  response_only: [id, created_at],
  required:      [name, description],
}

// ─── Circles ─────────────────────────────────────────────────────────────────

campus_model! {
  /// A group of members with access values.
  pub struct Circle {
    id:          CircleId,
    name:        Label,
    description: Text,
    tag:         Text,
    members:     Members,
    created_at:  Datetime,
    sources:     JsonObject,
  }
  hidden:        [],
  request_only:  [],
  response_only: [id, created_at, members, sources],
  required:      [name, tag],
}

campus_model! {
  /// Payload for creating a circle under its parents.
  pub struct CircleNew {
    name:        Label,
    description: Text,
    tag:         Text,
    parents:     Mapping<Text, AccessValue>,
  }
  hidden:        [],
  request_only:  [],
  response_only: [],
  required:      [name, tag],
}

campus_model! {
  /// Payload for renaming or redescribing a circle.
  pub struct CircleUpdate {
    name:        Label,
    description: Text,
  }
  hidden:        [],
  request_only:  [],
  response_only: [],
  required:      [],
}

campus_model! {
  pub struct CircleMemberAdd {
    member_id:    CampusId,
    access_value: AccessValue,
  }
  hidden:        [],
  request_only:  [],
  response_only: [],
  required:      [member_id, access_value],
}

campus_model! {
  pub struct CircleMemberRemove {
    member_id: CampusId,
  }
  hidden:        [],
  request_only:  [],
  response_only: [],
  required:      [member_id],
}

campus_model! {
  pub struct CircleMemberSet {
    member_id:    CampusId,
    access_value: AccessValue,
  }
  hidden:        [],
  request_only:  [],
  response_only: [],
  required:      [member_id, access_value],
}
