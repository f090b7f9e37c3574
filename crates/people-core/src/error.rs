//! Error types for `people-core`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of top-level entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Contact,
  Symptom,
}

impl EntityKind {
  /// Human-readable noun used in error messages.
  pub fn label(self) -> &'static str {
    match self {
      Self::Contact => "person",
      Self::Symptom => "symptom",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("The {kind} does not exist")]
  NotFound { kind: EntityKind, id: String },

  /// Raised when the store rejects an insert because the identifier is taken.
  #[error("The {kind} already exists")]
  AlreadyExists { kind: EntityKind, id: String },

  #[error("invalid value for `{field}`: {reason}")]
  Validation { field: &'static str, reason: String },

  #[error("malformed document: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
    Self::NotFound { kind, id: id.into() }
  }

  /// Wrap a backend error. Used as `.map_err(Error::store)`.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// The identifier an entity error refers to, if any.
  pub fn identifier(&self) -> Option<&str> {
    match self {
      Self::NotFound { id, .. } | Self::AlreadyExists { id, .. } => Some(id),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_name_the_entity() {
    let err = Error::not_found(EntityKind::Contact, "abc");
    assert_eq!(err.to_string(), "The person does not exist");
    assert_eq!(err.identifier(), Some("abc"));

    let err = Error::AlreadyExists {
      kind: EntityKind::Symptom,
      id:   "xyz".into(),
    };
    assert_eq!(err.to_string(), "The symptom already exists");
    assert_eq!(err.identifier(), Some("xyz"));
  }

  #[test]
  fn validation_has_no_identifier() {
    let err = Error::Validation {
      field:  "name",
      reason: "too short".into(),
    };
    assert!(err.identifier().is_none());
    assert!(err.to_string().contains("`name`"));
  }
}
