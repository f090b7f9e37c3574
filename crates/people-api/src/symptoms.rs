//! Handlers for top-level symptom endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/symptoms` | |
//! | `GET`    | `/person-symptoms/{id}` | Only reports owned by contact `id` |
//! | `GET`    | `/symptoms/{id}` | 404 if not found |
//! | `POST`   | `/symptoms` | 201 with the stored report |
//! | `PATCH`  | `/symptoms/{id}` | 204 |
//! | `DELETE` | `/symptoms/{id}` | 204 |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use people_core::{
  schema::Validate as _,
  store::DocumentStore,
  symptom::{NewSymptom, Symptom, SymptomPatch},
};
use tracing::info;

use crate::{AppState, error::ApiError, views::SymptomView};

fn views(symptoms: Vec<Symptom>) -> Json<Vec<SymptomView>> {
  Json(symptoms.into_iter().map(SymptomView::from).collect())
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /symptoms`
pub async fn list<S: DocumentStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<SymptomView>>, ApiError> {
  Ok(views(state.symptoms.list(None).await?))
}

/// `GET /person-symptoms/{id}`
pub async fn list_for_contact<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(contact_id): Path<String>,
) -> Result<Json<Vec<SymptomView>>, ApiError> {
  Ok(views(state.symptoms.list(Some(&contact_id)).await?))
}

/// `GET /symptoms/{id}`
pub async fn get_one<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<SymptomView>, ApiError> {
  let symptom = state.symptoms.get_by_id(&id).await?;
  Ok(Json(SymptomView::from(symptom)))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /symptoms`
pub async fn create<S: DocumentStore>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewSymptom>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  input.validate()?;

  let symptom = state.symptoms.create(input).await?;
  info!(symptom_id = %symptom.symptom_id, contact_id = %symptom.contact_id, "symptom created");
  Ok((StatusCode::CREATED, Json(SymptomView::from(symptom))))
}

/// `PATCH /symptoms/{id}`
pub async fn update<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
  body: Result<Json<SymptomPatch>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
  let Json(patch) = body?;
  patch.validate()?;

  state.symptoms.update(&id, patch).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /symptoms/{id}`
pub async fn delete<S: DocumentStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.symptoms.delete(&id).await?;
  info!(symptom_id = %id, "symptom deleted");
  Ok(StatusCode::NO_CONTENT)
}
