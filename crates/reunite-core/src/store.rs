//! Store traits and supporting query types.
//!
//! Implemented by storage backends (e.g. `reunite-store-sqlite`). Higher
//! layers — the match engine and the HTTP API — depend on these
//! abstractions, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  case::{
    AdditionalInfo, ApproveStatus, CaseKind, CaseRecord, CaseStatus, CaseUpdate,
    NewCase,
  },
  directory::{
    Address, Contact, Document, Fir, Hospital, NewAddress, NewContact,
    NewDocument, NewFir, NewHospital, NewPoliceStation, NewVolunteer,
    PoliceStation, Volunteer,
  },
  matching::{MatchRecord, NewMatch, PartnerKind},
  user::{NewUser, User, UserStatus},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Filter for [`CaseStore::list_cases`].
#[derive(Debug, Clone, Default)]
pub struct CaseQuery {
  pub kind:           Option<CaseKind>,
  pub case_status:    Option<CaseStatus>,
  pub approve_status: Option<ApproveStatus>,
  pub city:           Option<String>,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
}

/// Case-side mutation applied when a match is confirmed. One per side of
/// the pair.
#[derive(Debug, Clone)]
pub struct CaseResolution {
  /// The case row to mark resolved.
  pub case: Uuid,
  /// Kind of the record this case resolved against.
  pub match_with: CaseKind,
  pub matched_person_id: Uuid,
  pub matched_case_id:   Option<String>,
}

/// Result of [`MatchStore::apply_confirmation`]. The already-resolved guard
/// is re-checked inside the transaction that applies the writes, so a
/// concurrent confirmation through a different pairing cannot slip past the
/// engine's own check.
#[derive(Debug, Clone)]
pub enum ConfirmApply {
  Applied,
  /// One of the linked cases is already resolved; carries its display id.
  AlreadyResolved { case_id: String },
}

// ─── CaseStore ───────────────────────────────────────────────────────────────

/// Abstraction over case persistence.
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new case, allocating its sequential human-readable case id
  /// inside a write transaction (see the id-generation notes in
  /// [`crate::idgen`]).
  fn create_case(
    &self,
    input: NewCase,
  ) -> impl Future<Output = Result<CaseRecord, Self::Error>> + Send + '_;

  fn get_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CaseRecord>, Self::Error>> + Send + '_;

  fn list_cases<'a>(
    &'a self,
    query: &'a CaseQuery,
  ) -> impl Future<Output = Result<Vec<CaseRecord>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns the updated record, or `None` if the
  /// case does not exist or is deleted.
  fn update_case(
    &self,
    id: Uuid,
    update: CaseUpdate,
  ) -> impl Future<Output = Result<Option<CaseRecord>, Self::Error>> + Send + '_;

  /// Soft-delete. Returns `false` if the case was not found.
  fn soft_delete_case(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Move the moderation gate. Returns `false` if the case was not found.
  fn set_approve_status(
    &self,
    id: Uuid,
    status: ApproveStatus,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The candidate pool for a sweep: approved, pending-or-matched,
  /// non-deleted cases of `kind`, excluding `exclude`.
  fn eligible_candidates<'a>(
    &'a self,
    kind: CaseKind,
    exclude: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<CaseRecord>, Self::Error>> + Send + 'a;

  fn additional_info(
    &self,
    case: Uuid,
  ) -> impl Future<Output = Result<Option<AdditionalInfo>, Self::Error>> + Send + '_;

  fn upsert_additional_info(
    &self,
    case: Uuid,
    info: AdditionalInfo,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── MatchStore ──────────────────────────────────────────────────────────────

/// Abstraction over the pairwise match history.
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a new match row. Returns `None` when the `(missing_person,
  /// partner)` pair already exists — a concurrent sweep won the race — so
  /// callers treat the pair as already seen rather than failing.
  fn try_insert_match(
    &self,
    input: NewMatch,
  ) -> impl Future<Output = Result<Option<MatchRecord>, Self::Error>> + Send + '_;

  /// All match rows of `partner_kind` in which `anchor` participates on the
  /// given side.
  fn matches_for_anchor(
    &self,
    partner_kind: PartnerKind,
    anchor: Uuid,
    anchor_is_missing_person: bool,
  ) -> impl Future<Output = Result<Vec<MatchRecord>, Self::Error>> + Send + '_;

  /// Look up by client-facing match id, scoped to an anchor.
  fn find_match<'a>(
    &'a self,
    partner_kind: PartnerKind,
    anchor: Uuid,
    anchor_is_missing_person: bool,
    match_id: &'a str,
  ) -> impl Future<Output = Result<Option<MatchRecord>, Self::Error>> + Send + 'a;

  /// Look up by the two case ids of the pair (used by unconfirm, which
  /// addresses the match through the partner rather than the match id).
  fn find_match_by_pair(
    &self,
    partner_kind: PartnerKind,
    anchor: Uuid,
    anchor_is_missing_person: bool,
    other: Uuid,
  ) -> impl Future<Output = Result<Option<MatchRecord>, Self::Error>> + Send + '_;

  /// Persist the mutable fields of a match row (state, reasons, viewed
  /// flag, updated_by). Used by reject/unreject.
  fn save_match(
    &self,
    record: &MatchRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Atomically apply a confirmation: the mutated match row plus the
  /// resolution of both linked cases, in one transaction, re-checking that
  /// neither side is already resolved.
  fn apply_confirmation(
    &self,
    record: &MatchRecord,
    left: CaseResolution,
    right: CaseResolution,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<ConfirmApply, Self::Error>> + Send + '_;

  /// Atomically apply an unconfirmation: the mutated match row plus the
  /// reset of both linked cases to pending with cross-references cleared.
  fn apply_unconfirmation(
    &self,
    record: &MatchRecord,
    left_case: Uuid,
    right_case: Uuid,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Global (anchor-unscoped) viewed flag set. Returns `false` when no such
  /// match id exists.
  fn mark_viewed<'a>(
    &'a self,
    match_id: &'a str,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── DirectoryStore ──────────────────────────────────────────────────────────

/// CRUD over the supporting directory entities. No business rules; every
/// method is a thin row operation.
pub trait DirectoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn create_hospital(
    &self,
    input: NewHospital,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<Hospital, Self::Error>> + Send + '_;
  fn get_hospital(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Hospital>, Self::Error>> + Send + '_;
  fn list_hospitals(
    &self,
  ) -> impl Future<Output = Result<Vec<Hospital>, Self::Error>> + Send + '_;
  fn delete_hospital(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_police_station(
    &self,
    input: NewPoliceStation,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<PoliceStation, Self::Error>> + Send + '_;
  fn get_police_station(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PoliceStation>, Self::Error>> + Send + '_;
  fn list_police_stations(
    &self,
  ) -> impl Future<Output = Result<Vec<PoliceStation>, Self::Error>> + Send + '_;
  fn delete_police_station(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_volunteer(
    &self,
    input: NewVolunteer,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<Volunteer, Self::Error>> + Send + '_;
  fn get_volunteer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Volunteer>, Self::Error>> + Send + '_;
  fn list_volunteers(
    &self,
  ) -> impl Future<Output = Result<Vec<Volunteer>, Self::Error>> + Send + '_;
  fn delete_volunteer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_document(
    &self,
    input: NewDocument,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;
  fn get_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;
  fn list_documents(
    &self,
    person: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;
  fn delete_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_fir(
    &self,
    input: NewFir,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<Fir, Self::Error>> + Send + '_;
  fn get_fir(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Fir>, Self::Error>> + Send + '_;
  fn list_firs(
    &self,
    person: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Fir>, Self::Error>> + Send + '_;
  fn delete_fir(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_address(
    &self,
    input: NewAddress,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<Address, Self::Error>> + Send + '_;
  fn get_address(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Address>, Self::Error>> + Send + '_;
  fn list_addresses(
    &self,
    person: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Address>, Self::Error>> + Send + '_;
  fn delete_address(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_contact(
    &self,
    input: NewContact,
    acting: Option<Uuid>,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;
  fn get_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;
  fn list_contacts(
    &self,
    person: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;
  fn delete_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── UserStore ───────────────────────────────────────────────────────────────

/// User accounts. Password hashing lives in the API layer; the store only
/// moves PHC strings around.
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Returns `None` when the email is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(
    &self,
    status: Option<UserStatus>,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Returns `false` if the user was not found.
  fn set_user_status(
    &self,
    id: Uuid,
    status: UserStatus,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
