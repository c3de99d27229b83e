//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use reunite_core::Error as CoreError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("authentication required")]
  Unauthorized,

  #[error("{0}")]
  Forbidden(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"reunite\"")],
        Json(json!({ "error": "Authentication required." })),
      )
        .into_response(),
      ApiError::Forbidden(m) => {
        (StatusCode::FORBIDDEN, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Store(e) => {
        // Full context stays server-side; the client gets a generic message.
        tracing::error!(error = %e, "unhandled store error");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "Internal server error." })),
        )
          .into_response()
      }
    }
  }
}

/// Map engine/domain errors onto the HTTP taxonomy. State-machine
/// violations and validation failures are client errors; store failures
/// are 500s.
impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::CaseNotFound(_) => Self::NotFound("Case not found.".into()),
      CoreError::MatchNotFound => Self::NotFound(e.to_string()),
      CoreError::AlreadyTerminal(_)
      | CoreError::NotRejected(_)
      | CoreError::NotConfirmed(_)
      | CoreError::CaseAlreadyResolved { .. }
      | CoreError::InvalidRevertStatus
      | CoreError::MissingField { .. } => Self::BadRequest(e.to_string()),
      CoreError::Serialization(inner) => Self::Store(Box::new(inner)),
      CoreError::Store(inner) => Self::Store(inner),
    }
  }
}
