//! Error type for `people-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Every inserted document must carry a string `_id`.
  #[error("document for collection {collection:?} has no string `_id`")]
  MissingId { collection: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
