//! Handlers for contact endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/imei/{imei}` | 404 if no contact has this IMEI |
//! | `GET`    | `/people` | |
//! | `GET`    | `/people/{id}` | 404 if not found |
//! | `POST`   | `/people` | 201 with the stored contact |
//! | `PATCH`  | `/people/{id}` | 204; only the fields present are written |
//! | `DELETE` | `/people/{id}` | 204 |
//! | `PATCH`  | `/people-symptom/{id}` | 204; appends one symptom report |
//! | `PATCH`  | `/people-symptom-alarmsignal/{id}` | 204; optional `entry_id` |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use people_core::{
  contact::{ContactPatch, NewContact},
  schema::Validate as _,
  store::DocumentStore,
  symptom::{AlarmSignalInput, NewSymptomEntry},
};
use tracing::info;

use crate::{AppState, error::ApiError, views::ContactView};

fn today() -> NaiveDate { Utc::now().date_naive() }

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S: DocumentStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<ContactView>>, ApiError> {
  let today = today();
  let contacts = state.contacts.list().await?;
  Ok(Json(
    contacts
      .into_iter()
      .map(|contact| ContactView::new(contact, today))
      .collect(),
  ))
}

/// `GET /people/{id}`
pub async fn get_one<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<ContactView>, ApiError> {
  let contact = state.contacts.get_by_id(&id).await?;
  Ok(Json(ContactView::new(contact, today())))
}

/// `GET /imei/{imei}`
pub async fn get_by_imei<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(imei): Path<String>,
) -> Result<Json<ContactView>, ApiError> {
  let contact = state.contacts.get_by_imei(&imei).await?;
  Ok(Json(ContactView::new(contact, today())))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /people`
pub async fn create<S: DocumentStore>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewContact>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  input.validate()?;

  let contact = state.contacts.create(input).await?;
  info!(contact_id = %contact.contact_id, "person created");
  Ok((StatusCode::CREATED, Json(ContactView::new(contact, today()))))
}

/// `PATCH /people/{id}`
pub async fn update<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<ContactPatch>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
  let Json(patch) = body?;
  patch.validate()?;

  state.contacts.update(&id, patch).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /people/{id}`
pub async fn delete<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.contacts.delete(&id).await?;
  info!(contact_id = %id, "person deleted");
  Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /people-symptom/{id}`
pub async fn add_symptom<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<NewSymptomEntry>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
  let Json(entry) = body?;
  entry.validate()?;

  state.contacts.add_symptom(&id, entry).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /people-symptom-alarmsignal/{id}`
pub async fn add_alarm_signal<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<AlarmSignalInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
  let Json(input) = body?;
  input.validate()?;

  state.contacts.add_alarm_signal(&id, input).await?;
  Ok(StatusCode::NO_CONTENT)
}
