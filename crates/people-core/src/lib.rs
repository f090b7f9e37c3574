//! Core types and trait definitions for the people API.
//!
//! Holds the stored record shapes, the validated input variants, the
//! [`store::DocumentStore`] abstraction and the repositories that mediate
//! between the two. This crate is deliberately free of HTTP and database
//! dependencies.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod codec;
pub mod contact;
pub mod error;
pub mod ids;
pub mod repository;
pub mod schema;
pub mod store;
pub mod symptom;

pub use error::{EntityKind, Error, Result};
pub use repository::{ContactRepository, SymptomRepository};
