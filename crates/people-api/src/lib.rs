//! JSON REST API for the people service.
//!
//! Exposes an axum [`Router`] backed by any [`DocumentStore`]. TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(store, "people", "symptoms");
//! axum::serve(listener, people_api::api_router(state)).await?;
//! ```

pub mod error;
pub mod meta;
pub mod people;
pub mod symptoms;
pub mod views;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch},
};
use people_core::{ContactRepository, SymptomRepository, store::DocumentStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub contacts: ContactRepository<S>,
  pub symptoms: SymptomRepository<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      contacts: self.contacts.clone(),
      symptoms: self.symptoms.clone(),
    }
  }
}

impl<S: DocumentStore> AppState<S> {
  /// Both repositories share `store`, each over its own collection.
  pub fn new(
    store: Arc<S>,
    contacts_collection: impl Into<String>,
    symptoms_collection: impl Into<String>,
  ) -> Self {
    Self {
      contacts: ContactRepository::new(Arc::clone(&store), contacts_collection),
      symptoms: SymptomRepository::new(store, symptoms_collection),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: DocumentStore + 'static,
{
  Router::new()
    // People
    .route("/imei/{imei}", get(people::get_by_imei::<S>))
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .patch(people::update::<S>)
        .delete(people::delete::<S>),
    )
    .route("/people-symptom/{id}", patch(people::add_symptom::<S>))
    .route(
      "/people-symptom-alarmsignal/{id}",
      patch(people::add_alarm_signal::<S>),
    )
    // Symptoms
    .route("/person-symptoms/{id}", get(symptoms::list_for_contact::<S>))
    .route("/symptoms", get(symptoms::list::<S>).post(symptoms::create::<S>))
    .route(
      "/symptoms/{id}",
      get(symptoms::get_one::<S>)
        .patch(symptoms::update::<S>)
        .delete(symptoms::delete::<S>),
    )
    // Service
    .route("/health", get(meta::health))
    .route("/schema", get(meta::schema))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
