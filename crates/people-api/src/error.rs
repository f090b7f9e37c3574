//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use people_core::Error;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Domain(#[from] Error),

  /// The request body was missing, not JSON, or did not match the input type.
  #[error(transparent)]
  Body(#[from] JsonRejection),
}

impl ApiError {
  /// The status code this error maps to. Every variant has exactly one.
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Domain(Error::NotFound { .. }) => StatusCode::NOT_FOUND,
      ApiError::Domain(Error::AlreadyExists { .. }) => StatusCode::CONFLICT,
      ApiError::Domain(Error::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::Domain(Error::Serialization(_) | Error::Store(_)) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      ApiError::Body(rejection) => rejection.status(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      ApiError::Domain(err @ (Error::NotFound { id, .. } | Error::AlreadyExists { id, .. })) => {
        json!({ "message": err.to_string(), "identifier": id })
      }
      ApiError::Domain(err @ Error::Validation { field, .. }) => {
        json!({ "message": err.to_string(), "field": field })
      }
      ApiError::Domain(err) => {
        tracing::error!(error = %err, "request failed");
        json!({ "message": "Internal server error" })
      }
      ApiError::Body(rejection) => json!({ "message": rejection.body_text() }),
    };
    (status, Json(body)).into_response()
  }
}
