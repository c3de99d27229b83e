//! User accounts and roles.
//!
//! Passwords are stored as argon2 PHC strings; hashing and verification
//! happen in the API layer. A user must be approved by an admin before
//! credentials are accepted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The coarse role a user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  Admin,
  Police,
  Hospital,
  Family,
  Volunteer,
  Reporting,
}

impl UserRole {
  pub fn is_admin(self) -> bool {
    matches!(self, Self::Admin)
  }
}

/// Account moderation state. Only `Approved` users can authenticate.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
  Hold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:         Uuid,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone_no:   Option<String>,
  pub role:       UserRole,
  pub status:     UserStatus,
  /// Argon2 PHC string. Never serialized out.
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::UserStore::create_user`]. The password is
/// already hashed by the caller; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone_no:   Option<String>,
  pub role:       UserRole,
  pub status:     UserStatus,
  pub password_hash: String,
}
