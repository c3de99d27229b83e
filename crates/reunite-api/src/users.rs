//! Handlers for `/users` endpoints: registration and admin moderation.
//!
//! Accounts start out `pending` and cannot authenticate until an admin
//! approves them.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use reunite_core::user::{NewUser, User, UserRole, UserStatus};

use crate::{
  AppState, AppStore,
  auth::{CurrentUser, hash_password},
  error::ApiError,
};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone_no:   Option<String>,
  /// Defaults to the reporting role; admin accounts are provisioned out of
  /// band, never self-registered.
  pub role:     Option<UserRole>,
  pub password: String,
}

/// `POST /users/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  if body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("email is required.".into()));
  }
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password is required.".into()));
  }
  let role = match body.role {
    Some(UserRole::Admin) | None => UserRole::Reporting,
    Some(other) => other,
  };

  let input = NewUser {
    first_name: body.first_name,
    last_name: body.last_name,
    email: body.email,
    phone_no: body.phone_no,
    role,
    status: UserStatus::Pending,
    password_hash: hash_password(&body.password)?,
  };

  let user = state
    .store
    .create_user(input)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::BadRequest("Email already registered.".into())
    })?;

  tracing::info!(user = %user.id, "user registered");
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── List / self ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<UserStatus>,
}

/// `GET /users[?status=pending|approved|rejected|hold]` — admin only.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
  user: CurrentUser,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: AppStore,
{
  user.require_admin()?;
  let users = state
    .store
    .list_users(params.status)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(users))
}

/// `GET /users/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
) -> Result<Json<User>, ApiError>
where
  S: AppStore,
{
  let record = state
    .store
    .get_user(user.id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("User not found.".into()))?;
  Ok(Json(record))
}

// ─── Moderation ───────────────────────────────────────────────────────────────

async fn moderate<S>(
  state: &AppState<S>,
  id: Uuid,
  acting: CurrentUser,
  status: UserStatus,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  acting.require_admin()?;
  if !state
    .store
    .set_user_status(id, status)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::NotFound("User not found.".into()));
  }
  Ok(Json(json!({ "message": "User status updated." })))
}

/// `POST /users/:id/approve` — admin only.
pub async fn approve<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  acting: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  moderate(&state, id, acting, UserStatus::Approved).await
}

/// `POST /users/:id/reject` — admin only.
pub async fn reject<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  acting: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  moderate(&state, id, acting, UserStatus::Rejected).await
}
