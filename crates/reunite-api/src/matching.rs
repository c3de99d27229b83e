//! Handlers for the matching endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/{prefix}/:id` | Discovery sweep; anonymous allowed |
//! | `POST` | `/{prefix}/:id/match-reject` | `{match_id, reject_reason}` |
//! | `POST` | `/{prefix}/:id/match-unreject` | `{match_id, new_status, unreject_reason}` |
//! | `POST` | `/{prefix}/:id/match-confirm` | `{match_id, confirmation_note?, confirmed_from?}` |
//! | `POST` | `/{prefix}/:id/match-unconfirm` | `{matched_person_id, new_status, unconfirm_reason}` |
//! | `POST` | `/matches/:match_id/mark-viewed` | Global, not anchor-scoped |
//!
//! One route group serves all three sweep directions; the direction is
//! fixed when the group is mounted.

use axum::{
  Json, Router,
  extract::{Path, State},
  routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use reunite_core::{
  Error as CoreError,
  case::CaseKind,
  engine::{self, MatchEngine},
  matching::MatchDirection,
};

use crate::{
  AppState, AppStore,
  auth::{CurrentUser, MaybeUser},
  error::ApiError,
};

/// Routes for one sweep direction, to be nested under its path prefix.
pub fn routes<S>(direction: MatchDirection) -> Router<AppState<S>>
where
  S: AppStore,
{
  Router::new()
    .route(
      "/{id}",
      get(move |state, path, user| discover::<S>(state, path, user, direction)),
    )
    .route(
      "/{id}/match-reject",
      post(move |state, path, user, body| {
        reject::<S>(state, path, user, body, direction)
      }),
    )
    .route(
      "/{id}/match-unreject",
      post(move |state, path, user, body| {
        unreject::<S>(state, path, user, body, direction)
      }),
    )
    .route(
      "/{id}/match-confirm",
      post(move |state, path, user, body| {
        confirm::<S>(state, path, user, body, direction)
      }),
    )
    .route(
      "/{id}/match-unconfirm",
      post(move |state, path, user, body| {
        unconfirm::<S>(state, path, user, body, direction)
      }),
    )
}

/// The anchor-missing message mirrors the anchor kind of the route group.
fn anchor_not_found(direction: MatchDirection) -> ApiError {
  let message = match direction.anchor_kind() {
    CaseKind::MissingPerson => "Missing person not found.",
    CaseKind::UnidentifiedPerson => "Unidentified person not found.",
    CaseKind::UnidentifiedBody => "Unidentified body not found.",
  };
  ApiError::NotFound(message.into())
}

fn map_engine_error(e: CoreError, direction: MatchDirection) -> ApiError {
  match e {
    CoreError::CaseNotFound(_) => anchor_not_found(direction),
    other => other.into(),
  }
}

fn require_field(
  value: Option<String>,
  field: &'static str,
) -> Result<String, ApiError> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or_else(|| ApiError::BadRequest(format!("{field} is required.")))
}

// ─── Discovery ────────────────────────────────────────────────────────────────

/// `GET /{prefix}/:id` — run the discovery sweep and return the categorized
/// buckets plus the serialized anchor.
///
/// Anonymous access is allowed; an authenticated caller is recorded as
/// `created_by` on any match rows the sweep creates.
pub async fn discover<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: MaybeUser,
  direction: MatchDirection,
) -> Result<Json<Value>, ApiError>
where
  S: AppStore,
{
  let engine = MatchEngine::new(&*state.store, direction, state.scoring);
  let result = engine
    .discover(id, user.id())
    .await
    .map_err(|e| map_engine_error(e, direction))?;

  Ok(Json(json!({
    "newly_matched": result.newly_matched,
    "previously_matched": result.previously_matched,
    "viewed": result.viewed,
    "rejected": result.rejected,
    "confirmed": result.confirmed,
    (direction.anchor_key()): result.anchor,
  })))
}

// ─── Reject ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RejectBody {
  pub match_id:      Option<String>,
  pub reject_reason: Option<String>,
}

/// `POST /{prefix}/:id/match-reject`
pub async fn reject<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
  Json(body): Json<RejectBody>,
  direction: MatchDirection,
) -> Result<Json<Value>, ApiError>
where
  S: AppStore,
{
  let match_id = require_field(body.match_id, "match_id")?;
  let reason = body.reject_reason.unwrap_or_default();

  let engine = MatchEngine::new(&*state.store, direction, state.scoring);
  engine
    .reject(id, &match_id, &reason, Some(user.id))
    .await
    .map_err(|e| map_engine_error(e, direction))?;

  Ok(Json(json!({ "message": "Match rejected successfully." })))
}

// ─── Unreject ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UnrejectBody {
  pub match_id: Option<String>,
  #[serde(default = "default_revert_status")]
  pub new_status: String,
  pub unreject_reason: Option<String>,
}

fn default_revert_status() -> String {
  "matched".to_string()
}

/// `POST /{prefix}/:id/match-unreject`
pub async fn unreject<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
  Json(body): Json<UnrejectBody>,
  direction: MatchDirection,
) -> Result<Json<Value>, ApiError>
where
  S: AppStore,
{
  let match_id = require_field(body.match_id, "match_id")?;
  let reason = body.unreject_reason.unwrap_or_default();

  let engine = MatchEngine::new(&*state.store, direction, state.scoring);
  let restored = engine
    .unreject(id, &match_id, &body.new_status, &reason, Some(user.id))
    .await
    .map_err(|e| map_engine_error(e, direction))?;

  Ok(Json(json!({
    "message": format!("Match status reverted to '{restored}' successfully.")
  })))
}

// ─── Confirm ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConfirmBody {
  pub match_id:          Option<String>,
  pub confirmation_note: Option<String>,
  /// Free-form provenance tag from the client; logged, not stored.
  pub confirmed_from: Option<String>,
}

/// `POST /{prefix}/:id/match-confirm`
pub async fn confirm<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
  Json(body): Json<ConfirmBody>,
  direction: MatchDirection,
) -> Result<Json<Value>, ApiError>
where
  S: AppStore,
{
  let match_id = require_field(body.match_id, "match_id")?;
  if let Some(from) = &body.confirmed_from {
    tracing::debug!(match_id, confirmed_from = %from, "confirm provenance");
  }

  let engine = MatchEngine::new(&*state.store, direction, state.scoring);
  engine
    .confirm(id, &match_id, body.confirmation_note, Some(user.id))
    .await
    .map_err(|e| map_engine_error(e, direction))?;

  Ok(Json(json!({ "message": "Match confirmed successfully." })))
}

// ─── Unconfirm ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UnconfirmBody {
  pub matched_person_id: Option<Uuid>,
  #[serde(default = "default_revert_status")]
  pub new_status: String,
  pub unconfirm_reason: Option<String>,
}

/// `POST /{prefix}/:id/match-unconfirm` — the match is addressed through
/// the partner's case id rather than the match id.
pub async fn unconfirm<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
  Json(body): Json<UnconfirmBody>,
  direction: MatchDirection,
) -> Result<Json<Value>, ApiError>
where
  S: AppStore,
{
  let matched_person_id = body.matched_person_id.ok_or_else(|| {
    ApiError::BadRequest("matched_person_id is required.".into())
  })?;
  let reason = body.unconfirm_reason.unwrap_or_default();

  let engine = MatchEngine::new(&*state.store, direction, state.scoring);
  let restored = engine
    .unconfirm(
      id,
      matched_person_id,
      &body.new_status,
      &reason,
      Some(user.id),
    )
    .await
    .map_err(|e| map_engine_error(e, direction))?;

  Ok(Json(json!({
    "message": format!("Match unconfirmed. Status reverted to '{restored}'.")
  })))
}

// ─── Mark viewed ──────────────────────────────────────────────────────────────

/// `POST /matches/:match_id/mark-viewed` — global lookup, any state.
pub async fn mark_viewed_handler<S>(
  State(state): State<AppState<S>>,
  Path(match_id): Path<String>,
  user: CurrentUser,
) -> Result<&'static str, ApiError>
where
  S: AppStore,
{
  engine::mark_viewed(&*state.store, &match_id, Some(user.id)).await?;
  Ok("status changed successfully")
}
