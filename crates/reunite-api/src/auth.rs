//! HTTP Basic-auth extractors and password hashing.
//!
//! Credentials are checked against argon2 PHC hashes on user rows; only
//! approved accounts authenticate. Handlers that allow anonymous access
//! take [`MaybeUser`] instead of [`CurrentUser`] so the acting user is
//! still recorded when one is present.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use rand_core::OsRng;
use uuid::Uuid;

use reunite_core::user::{UserRole, UserStatus};

use crate::{AppState, AppStore, error::ApiError};

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::BadRequest(format!("cannot hash password: {e}")))
}

fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The authenticated acting user.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
  pub id:   Uuid,
  pub role: UserRole,
}

impl CurrentUser {
  /// Admin gate for moderation endpoints.
  pub fn require_admin(&self) -> Result<(), ApiError> {
    if self.role.is_admin() {
      Ok(())
    } else {
      Err(ApiError::Forbidden("Admin access required.".into()))
    }
  }
}

/// Anonymous-tolerant variant: `None` when no valid credentials were sent.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl MaybeUser {
  pub fn id(&self) -> Option<Uuid> {
    self.0.map(|u| u.id)
  }
}

async fn authenticate<S>(
  headers: &HeaderMap,
  state: &AppState<S>,
) -> Result<CurrentUser, ApiError>
where
  S: AppStore,
{
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;
  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;
  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds =
    std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;
  let (email, password) =
    creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let user = state
    .store
    .get_user_by_email(email)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  if user.status != UserStatus::Approved
    || !verify_password(password, &user.password_hash)
  {
    return Err(ApiError::Unauthorized);
  }

  Ok(CurrentUser { id: user.id, role: user.role })
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: AppStore,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, state).await
  }
}

impl<S> FromRequestParts<AppState<S>> for MaybeUser
where
  S: AppStore,
{
  type Rejection = std::convert::Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(MaybeUser(authenticate(&parts.headers, state).await.ok()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify_roundtrip() {
    let phc = hash_password("correct horse").unwrap();
    assert!(verify_password("correct horse", &phc));
    assert!(!verify_password("wrong", &phc));
  }

  #[test]
  fn verify_rejects_malformed_phc() {
    assert!(!verify_password("anything", "not-a-phc-string"));
  }
}
