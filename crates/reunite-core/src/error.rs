//! Error types for `reunite-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::matching::MatchType;

#[derive(Debug, Error)]
pub enum Error {
  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  #[error("Match not found.")]
  MatchNotFound,

  /// Reject/confirm attempted on a match already in a terminal state.
  #[error("Match already {0}.")]
  AlreadyTerminal(MatchType),

  /// Unreject attempted on a match that is not rejected.
  #[error("Match is not rejected. Current status is {0}.")]
  NotRejected(MatchType),

  /// Unconfirm attempted on a match that is not confirmed.
  #[error("Match is not confirmed. Current status is {0}.")]
  NotConfirmed(MatchType),

  /// Confirm attempted while a linked case already holds a confirmed match
  /// through some other pairing.
  #[error("Case {case_id} is already resolved.")]
  CaseAlreadyResolved { case_id: String },

  #[error("Invalid new_status. Use 'matched' or 'potential'.")]
  InvalidRevertStatus,

  #[error("{field} is required.")]
  MissingField { field: &'static str },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// An error surfaced by the backing store.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a store-specific error for propagation through the engine.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
