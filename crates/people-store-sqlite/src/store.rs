//! [`SqliteDocumentStore`], the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use people_core::store::{
  Document, DocumentStore, Filter, ID_FIELD, InsertOutcome, Update, UpdateOutcome,
};
use rusqlite::OptionalExtension as _;
use serde_json::Value;

use crate::{
  Error, Result,
  encode::{bind, decode_body, encode_filter},
  schema::SCHEMA,
};

/// Box a non-SQLite failure raised inside a connection closure.
fn other<E>(err: E) -> tokio_rusqlite::Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tokio_rusqlite::Error::Other(Box::new(err))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteDocumentStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteDocumentStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteDocumentStore {
  type Error = Error;

  async fn find_one(&self, collection: &str, filter: Filter) -> Result<Option<Document>> {
    let (clause, params) = encode_filter(&filter);
    let args = bind(collection, params);
    let sql = format!(
      "SELECT body FROM documents WHERE collection = ?1{clause} ORDER BY rowid LIMIT 1"
    );

    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params_from_iter(args), |row| row.get(0))
          .optional()?)
      })
      .await?;

    body.as_deref().map(decode_body).transpose()
  }

  async fn find(&self, collection: &str, filter: Filter) -> Result<Vec<Document>> {
    let (clause, params) = encode_filter(&filter);
    let args = bind(collection, params);
    let sql =
      format!("SELECT body FROM documents WHERE collection = ?1{clause} ORDER BY rowid");

    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    bodies.iter().map(|body| decode_body(body)).collect()
  }

  async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertOutcome> {
    let id = document
      .get(ID_FIELD)
      .and_then(Value::as_str)
      .map(str::to_owned)
      .ok_or_else(|| Error::MissingId {
        collection: collection.to_owned(),
      })?;
    let body = serde_json::to_string(&document)?;
    let collection = collection.to_owned();
    let doc_id = id.clone();

    // The primary key turns a reused identifier into a zero-row insert.
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)",
          rusqlite::params![collection, doc_id, body],
        )?)
      })
      .await?;

    if inserted == 0 {
      tracing::warn!(doc_id = %id, "insert rejected: identifier already taken");
      return Ok(InsertOutcome::Duplicate(id));
    }
    Ok(InsertOutcome::Inserted(id))
  }

  async fn update_one(
    &self,
    collection: &str,
    filter: Filter,
    update: Update,
  ) -> Result<UpdateOutcome> {
    let (clause, params) = encode_filter(&filter);
    let args = bind(collection, params);
    let select = format!(
      "SELECT rowid, body FROM documents WHERE collection = ?1{clause} ORDER BY rowid LIMIT 1"
    );

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let found: Option<(i64, String)> = tx
          .query_row(&select, rusqlite::params_from_iter(args), |row| {
            Ok((row.get(0)?, row.get(1)?))
          })
          .optional()?;
        let Some((rowid, body)) = found else {
          return Ok(UpdateOutcome::default());
        };

        let mut doc = decode_body(&body).map_err(other)?;
        let Some(changed) = update.apply(&mut doc) else {
          return Ok(UpdateOutcome::default());
        };

        if changed {
          let body = serde_json::to_string(&doc).map_err(other)?;
          tx.execute(
            "UPDATE documents SET body = ?1 WHERE rowid = ?2",
            rusqlite::params![body, rowid],
          )?;
        }
        tx.commit()?;

        Ok(UpdateOutcome {
          matched:  1,
          modified: u64::from(changed),
        })
      })
      .await?;

    Ok(outcome)
  }

  async fn delete_one(&self, collection: &str, filter: Filter) -> Result<u64> {
    let (clause, params) = encode_filter(&filter);
    let args = bind(collection, params);
    let sql = format!(
      "DELETE FROM documents WHERE rowid = (
         SELECT rowid FROM documents WHERE collection = ?1{clause} ORDER BY rowid LIMIT 1
       )"
    );

    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params_from_iter(args))?))
      .await?;

    Ok(deleted as u64)
  }
}
