//! Match records and the pairing vocabulary of the engine.
//!
//! A match row always stores the missing-person side on the left, whichever
//! side the sweep was anchored on. This lets the MP→UP and UP→MP sweeps
//! share one history, and makes the pair uniqueness constraint a plain
//! `(missing_person_id, partner_id)` key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  case::{CaseKind, CaseRecord},
  error::{Error, Result},
  score::MatchParameters,
};

// ─── Match state ─────────────────────────────────────────────────────────────

/// The lifecycle state of a match row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
  Potential,
  Matched,
  Rejected,
  Confirmed,
}

impl MatchType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Potential => "potential",
      Self::Matched => "matched",
      Self::Rejected => "rejected",
      Self::Confirmed => "confirmed",
    }
  }

  /// `rejected` and `confirmed` both refuse further reject/confirm calls.
  pub fn is_terminal(self) -> bool {
    matches!(self, Self::Rejected | Self::Confirmed)
  }

  /// Parse a client-supplied revert target for unreject/unconfirm. Only
  /// `matched` and `potential` are legal.
  pub fn revert_target(s: &str) -> Result<Self> {
    match s {
      "matched" => Ok(Self::Matched),
      "potential" => Ok(Self::Potential),
      _ => Err(Error::InvalidRevertStatus),
    }
  }
}

impl std::fmt::Display for MatchType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Pairing vocabulary ──────────────────────────────────────────────────────

/// The non-missing-person side of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerKind {
  UnidentifiedPerson,
  UnidentifiedBody,
}

impl PartnerKind {
  pub fn case_kind(self) -> CaseKind {
    match self {
      Self::UnidentifiedPerson => CaseKind::UnidentifiedPerson,
      Self::UnidentifiedBody => CaseKind::UnidentifiedBody,
    }
  }
}

/// One of the three sweep directions. Missing persons pair with unidentified
/// persons or bodies; the latter two never pair with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDirection {
  /// Missing-person anchor, unidentified-person candidates.
  MpToUp,
  /// Missing-person anchor, unidentified-body candidates.
  MpToUb,
  /// Unidentified-person anchor, missing-person candidates.
  UpToMp,
}

impl MatchDirection {
  pub fn anchor_kind(self) -> CaseKind {
    match self {
      Self::MpToUp | Self::MpToUb => CaseKind::MissingPerson,
      Self::UpToMp => CaseKind::UnidentifiedPerson,
    }
  }

  pub fn candidate_kind(self) -> CaseKind {
    match self {
      Self::MpToUp => CaseKind::UnidentifiedPerson,
      Self::MpToUb => CaseKind::UnidentifiedBody,
      Self::UpToMp => CaseKind::MissingPerson,
    }
  }

  /// The partner kind of the rows this direction reads and writes.
  pub fn partner_kind(self) -> PartnerKind {
    match self {
      Self::MpToUp | Self::UpToMp => PartnerKind::UnidentifiedPerson,
      Self::MpToUb => PartnerKind::UnidentifiedBody,
    }
  }

  /// Whether the anchor sits on the missing-person side of stored pairs.
  pub fn anchor_is_missing_person(self) -> bool {
    matches!(self, Self::MpToUp | Self::MpToUb)
  }

  /// JSON key under which the serialized anchor is returned.
  pub fn anchor_key(self) -> &'static str {
    match self {
      Self::MpToUp | Self::MpToUb => "missing_person",
      Self::UpToMp => "unidentified_person",
    }
  }
}

// ─── MatchRecord ─────────────────────────────────────────────────────────────

/// A persisted pairing between a missing person and a partner case.
/// Created only by the discovery sweep; mutated only by lifecycle
/// transitions; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
  pub id:       Uuid,
  /// The only identifier exposed to clients, e.g. `MATCH-20250803-7QX2`.
  pub match_id: String,

  pub missing_person_id: Uuid,
  pub partner_id:        Uuid,
  pub partner_kind:      PartnerKind,

  pub match_type: MatchType,
  /// Computed once at creation; never recomputed by transitions.
  pub score: u8,
  /// Snapshot of the per-attribute comparison at creation time.
  pub match_parameters: MatchParameters,

  pub reject_reason:     Option<String>,
  pub unreject_reason:   Option<String>,
  pub confirmation_note: Option<String>,
  pub unconfirm_reason:  Option<String>,

  /// Set on confirm to the kind of the partner the anchor resolved against.
  pub match_with: Option<CaseKind>,

  pub is_viewed: bool,

  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub created_by: Option<Uuid>,
  pub updated_by: Option<Uuid>,
}

impl MatchRecord {
  /// The id of whichever side of the pair `anchor` is not.
  pub fn other_side(&self, anchor: Uuid) -> Uuid {
    if self.missing_person_id == anchor {
      self.partner_id
    } else {
      self.missing_person_id
    }
  }
}

/// Input to [`crate::store::MatchStore::try_insert_match`]. The store
/// assigns `id`, `match_id`, and the timestamps.
#[derive(Debug, Clone)]
pub struct NewMatch {
  pub missing_person_id: Uuid,
  pub partner_id:        Uuid,
  pub partner_kind:      PartnerKind,
  pub match_type:        MatchType,
  pub score:             u8,
  pub match_parameters:  MatchParameters,
  pub created_by:        Option<Uuid>,
}

// ─── Sweep output ────────────────────────────────────────────────────────────

/// One row of a sweep response bucket: the other side of the pair plus the
/// match metadata a reviewer needs.
#[derive(Debug, Clone, Serialize)]
pub struct MatchEntry {
  pub person:   CaseRecord,
  pub score:    u8,
  pub match_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub match_type: Option<MatchType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  pub is_viewed: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reject_reason: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub confirmation_note: Option<String>,
}

/// The categorized result of a discovery sweep. Buckets are pairwise
/// disjoint and each is sorted by score descending.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedMatches {
  pub newly_matched:      Vec<MatchEntry>,
  pub previously_matched: Vec<MatchEntry>,
  pub viewed:             Vec<MatchEntry>,
  pub rejected:           Vec<MatchEntry>,
  pub confirmed:          Vec<MatchEntry>,
  /// The anchor record, serialized under the direction's anchor key by the
  /// API layer.
  #[serde(skip)]
  pub anchor: CaseRecord,
}
