//! SQL schema for the people SQLite store.
//!
//! Executed once at connection startup. The version in `PRAGMA user_version`
//! is reserved for gating future layout changes.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per document. `body` is the full JSON object, `_id` included;
-- `doc_id` duplicates it so the primary key enforces uniqueness.
CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT NOT NULL,
    doc_id      TEXT NOT NULL,
    body        TEXT NOT NULL,
    PRIMARY KEY (collection, doc_id)
);

PRAGMA user_version = 1;
";
