//! Error type for `reunite-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] reunite_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {what}: {value:?}")]
  UnknownDiscriminant { what: &'static str, value: String },

  /// The match-id generator kept colliding with existing ids. Practically
  /// unreachable.
  #[error("could not allocate a unique match id")]
  MatchIdExhausted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
