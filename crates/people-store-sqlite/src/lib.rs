//! SQLite backend for the people document store.
//!
//! Documents are kept as JSON text in a single table keyed by collection and
//! identifier. Wraps [`tokio_rusqlite`] so all database access runs on a
//! dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteDocumentStore;

#[cfg(test)]
mod tests;
