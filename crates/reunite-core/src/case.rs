//! Case records — the central entity of the store.
//!
//! One record represents one reported case. The same shape serves all three
//! case kinds; kind-specific fields are simply left empty where they do not
//! apply (an unidentified body has an age range rather than an exact age,
//! a missing person has no hospital link, and so on).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Kind & status enums ─────────────────────────────────────────────────────

/// The kind of case a record represents. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
  MissingPerson,
  UnidentifiedPerson,
  UnidentifiedBody,
}

impl CaseKind {
  /// Human-readable label, as stored and shown to clients.
  pub fn label(self) -> &'static str {
    match self {
      Self::MissingPerson => "Missing Person",
      Self::UnidentifiedPerson => "Unidentified Person",
      Self::UnidentifiedBody => "Unidentified Body",
    }
  }

  /// Two-letter prefix used in generated case ids.
  pub fn type_code(self) -> &'static str {
    match self {
      Self::MissingPerson => "MP",
      Self::UnidentifiedPerson => "UP",
      Self::UnidentifiedBody => "UB",
    }
  }
}

impl std::fmt::Display for CaseKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// Resolution state of a case. `Resolved` is only ever set by a confirmed
/// match and only ever cleared by unconfirming it.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
  #[default]
  Pending,
  Matched,
  Resolved,
}

/// Moderation gate. Only approved cases are visible to matching, either as
/// an anchor or as a candidate.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ApproveStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
  Suspended,
  OnHold,
  Archived,
}

// ─── CaseRecord ──────────────────────────────────────────────────────────────

/// A persisted case. Descriptive attributes are free-form strings compared
/// case-insensitively by the scorer; absence simply contributes nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
  pub id:      Uuid,
  /// Human-readable id, e.g. `MP-202508-PUNE-001`. Assigned on first save.
  pub case_id: Option<String>,
  pub kind:    CaseKind,

  pub full_name: Option<String>,

  // Descriptive attributes used by scoring.
  pub gender:           Option<String>,
  pub age:              Option<i32>,
  /// Bucketed age, stored as `"min-max"`.
  pub age_range:        Option<String>,
  pub height:           Option<i32>,
  /// Bucketed height in cm, stored as `"min-max"`.
  pub height_range:     Option<String>,
  /// Weight in grams.
  pub weight:           Option<i32>,
  pub blood_group:      Option<String>,
  pub complexion:       Option<String>,
  pub hair_color:       Option<String>,
  pub hair_type:        Option<String>,
  pub eye_color:        Option<String>,
  pub birth_mark:       Option<String>,
  pub distinctive_mark: Option<String>,

  // Location of the report; `city` feeds the case-id location code.
  pub city:     Option<String>,
  pub district: Option<String>,
  pub state:    Option<String>,
  pub country:  Option<String>,
  pub pincode:  Option<String>,

  pub reported_date: NaiveDate,

  pub approve_status: ApproveStatus,
  pub case_status:    CaseStatus,

  // Cross-references populated by a confirmed match, cleared on unconfirm.
  pub match_with:        Option<CaseKind>,
  pub matched_person_id: Option<Uuid>,
  pub matched_case_id:   Option<String>,

  /// Intake hospital for unidentified persons/bodies.
  pub hospital_id: Option<Uuid>,

  /// Soft-delete flag. Deleted records never enter a matching pool.
  pub deleted: bool,

  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub created_by: Option<Uuid>,
  pub updated_by: Option<Uuid>,
}

impl CaseRecord {
  /// Whether this record may participate in matching at all.
  pub fn is_matchable(&self) -> bool {
    self.approve_status == ApproveStatus::Approved && !self.deleted
  }
}

// ─── NewCase ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::create_case`]. The store assigns
/// `id`, `case_id`, and the timestamps.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCase {
  pub kind: CaseKind,

  pub full_name: Option<String>,

  pub gender:           Option<String>,
  pub age:              Option<i32>,
  pub age_range:        Option<String>,
  pub height:           Option<i32>,
  pub height_range:     Option<String>,
  pub weight:           Option<i32>,
  pub blood_group:      Option<String>,
  pub complexion:       Option<String>,
  pub hair_color:       Option<String>,
  pub hair_type:        Option<String>,
  pub eye_color:        Option<String>,
  pub birth_mark:       Option<String>,
  pub distinctive_mark: Option<String>,

  pub city:     Option<String>,
  pub district: Option<String>,
  pub state:    Option<String>,
  pub country:  Option<String>,
  pub pincode:  Option<String>,

  /// Defaults to today when omitted.
  pub reported_date: Option<NaiveDate>,

  pub hospital_id: Option<Uuid>,

  #[serde(skip)]
  pub created_by: Option<Uuid>,
}

// ─── CaseUpdate ──────────────────────────────────────────────────────────────

/// Partial update for a case. `None` fields are left untouched; the kind,
/// approval gate, and match cross-references are not writable through this
/// path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaseUpdate {
  pub full_name: Option<String>,

  pub gender:           Option<String>,
  pub age:              Option<i32>,
  pub age_range:        Option<String>,
  pub height:           Option<i32>,
  pub height_range:     Option<String>,
  pub weight:           Option<i32>,
  pub blood_group:      Option<String>,
  pub complexion:       Option<String>,
  pub hair_color:       Option<String>,
  pub hair_type:        Option<String>,
  pub eye_color:        Option<String>,
  pub birth_mark:       Option<String>,
  pub distinctive_mark: Option<String>,

  pub city:     Option<String>,
  pub district: Option<String>,
  pub state:    Option<String>,
  pub country:  Option<String>,
  pub pincode:  Option<String>,

  pub hospital_id: Option<Uuid>,

  #[serde(skip)]
  pub updated_by: Option<Uuid>,
}

// ─── AdditionalInfo ──────────────────────────────────────────────────────────

/// Optional demographic supplement for a case, consulted by the extended
/// scorer when enabled. At most one row per case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdditionalInfo {
  pub caste:          Option<String>,
  pub subcaste:       Option<String>,
  pub marital_status: Option<String>,
  pub religion:       Option<String>,
  pub mother_tongue:  Option<String>,
  #[serde(default)]
  pub other_known_languages: Vec<String>,
  pub education_details:  Option<String>,
  pub occupation_details: Option<String>,
  pub id_type: Option<String>,
  pub id_no:   Option<String>,
}
