//! Integration tests for `SqliteStore` and the match engine against an
//! in-memory database.

use reunite_core::{
  Error as CoreError,
  case::{ApproveStatus, CaseKind, CaseStatus, NewCase},
  directory::NewHospital,
  engine::{MatchEngine, mark_viewed},
  matching::{MatchDirection, MatchType},
  score::ScoringOptions,
  store::{CaseQuery, CaseStore, DirectoryStore, MatchStore, UserStore},
  user::{NewUser, UserRole, UserStatus},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn blank_case(kind: CaseKind) -> NewCase {
  NewCase {
    kind,
    full_name: None,
    gender: None,
    age: None,
    age_range: None,
    height: None,
    height_range: None,
    weight: None,
    blood_group: None,
    complexion: None,
    hair_color: None,
    hair_type: None,
    eye_color: None,
    birth_mark: None,
    distinctive_mark: None,
    city: None,
    district: None,
    state: None,
    country: None,
    pincode: None,
    reported_date: None,
    hospital_id: None,
    created_by: None,
  }
}

/// A missing person that passes both scoring vetoes against [`up_case`].
fn mp_case() -> NewCase {
  NewCase {
    gender: Some("male".into()),
    age: Some(30),
    ..blank_case(CaseKind::MissingPerson)
  }
}

/// An unidentified person compatible with [`mp_case`]: 55 points (gender 25
/// + age 30).
fn up_case() -> NewCase {
  NewCase {
    gender: Some("male".into()),
    age_range: Some("25-35".into()),
    ..blank_case(CaseKind::UnidentifiedPerson)
  }
}

/// Create a case and approve it so it participates in matching.
async fn approved(s: &SqliteStore, input: NewCase) -> reunite_core::case::CaseRecord {
  let case = s.create_case(input).await.unwrap();
  s.set_approve_status(case.id, ApproveStatus::Approved, None)
    .await
    .unwrap();
  s.get_case(case.id).await.unwrap().unwrap()
}

fn engine(s: &SqliteStore) -> MatchEngine<'_, SqliteStore> {
  MatchEngine::new(s, MatchDirection::MpToUp, ScoringOptions::default())
}

// ─── Case ids ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn case_ids_are_sequential_per_kind_city_month() {
  let s = store().await;
  let first = s
    .create_case(NewCase { city: Some("Pune".into()), ..mp_case() })
    .await
    .unwrap();
  let second = s
    .create_case(NewCase { city: Some("Pune".into()), ..mp_case() })
    .await
    .unwrap();

  let first_id = first.case_id.unwrap();
  let second_id = second.case_id.unwrap();
  assert!(first_id.starts_with("MP-"), "{first_id}");
  assert!(first_id.ends_with("-001"), "{first_id}");
  assert!(second_id.ends_with("-002"), "{second_id}");
  assert!(first_id.contains("-PUNE-"));
}

#[tokio::test]
async fn case_id_sequences_are_independent_per_city_and_kind() {
  let s = store().await;
  s.create_case(NewCase { city: Some("Pune".into()), ..mp_case() })
    .await
    .unwrap();
  let other_city = s
    .create_case(NewCase { city: Some("Nagpur".into()), ..mp_case() })
    .await
    .unwrap();
  let other_kind = s
    .create_case(NewCase { city: Some("Pune".into()), ..up_case() })
    .await
    .unwrap();

  assert!(other_city.case_id.unwrap().ends_with("NAGP-001"));
  assert!(other_kind.case_id.unwrap().starts_with("UP-"));
}

#[tokio::test]
async fn concurrent_case_creation_yields_distinct_sequential_ids() {
  let s = store().await;
  let (a, b) = tokio::join!(
    s.create_case(NewCase { city: Some("Pune".into()), ..mp_case() }),
    s.create_case(NewCase { city: Some("Pune".into()), ..mp_case() }),
  );
  let a = a.unwrap().case_id.unwrap();
  let b = b.unwrap().case_id.unwrap();
  assert_ne!(a, b);
  let mut suffixes = vec![a.clone(), b.clone()];
  suffixes.sort();
  assert!(suffixes[0].ends_with("-001"), "{suffixes:?}");
  assert!(suffixes[1].ends_with("-002"), "{suffixes:?}");
}

#[tokio::test]
async fn blank_city_uses_placeholder_location() {
  let s = store().await;
  let case = s
    .create_case(NewCase { city: Some("   ".into()), ..mp_case() })
    .await
    .unwrap();
  assert!(case.case_id.unwrap().contains("-XXX-"));
  assert!(case.city.is_none());
}

// ─── Case CRUD ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn soft_deleted_cases_vanish_from_listing() {
  let s = store().await;
  let case = s.create_case(mp_case()).await.unwrap();
  assert_eq!(s.list_cases(&CaseQuery::default()).await.unwrap().len(), 1);

  assert!(s.soft_delete_case(case.id).await.unwrap());
  assert!(s.list_cases(&CaseQuery::default()).await.unwrap().is_empty());
  // Row still readable by id, flagged deleted.
  assert!(s.get_case(case.id).await.unwrap().unwrap().deleted);
  // Second delete is a no-op.
  assert!(!s.soft_delete_case(case.id).await.unwrap());
}

#[tokio::test]
async fn list_cases_filters_by_kind_and_status() {
  let s = store().await;
  approved(&s, mp_case()).await;
  s.create_case(up_case()).await.unwrap();

  let mps = s
    .list_cases(&CaseQuery {
      kind: Some(CaseKind::MissingPerson),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(mps.len(), 1);

  let pending_approval = s
    .list_cases(&CaseQuery {
      approve_status: Some(ApproveStatus::Pending),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(pending_approval.len(), 1);
  assert_eq!(pending_approval[0].kind, CaseKind::UnidentifiedPerson);
}

// ─── Discovery sweep ─────────────────────────────────────────────────────────

#[tokio::test]
async fn discover_scores_and_persists_candidates() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let up = approved(&s, up_case()).await;

  let result = engine(&s).discover(mp.id, None).await.unwrap();
  assert_eq!(result.newly_matched.len(), 1);
  assert_eq!(result.newly_matched[0].score, 55);
  assert_eq!(result.newly_matched[0].person.id, up.id);
  assert!(!result.newly_matched[0].is_viewed);

  let history = s
    .matches_for_anchor(
      MatchDirection::MpToUp.partner_kind(),
      mp.id,
      true,
    )
    .await
    .unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].match_type, MatchType::Potential);
  assert_eq!(history[0].score, 55);
}

#[tokio::test]
async fn discover_marks_high_scores_as_matched() {
  let s = store().await;
  let mp = approved(
    &s,
    NewCase { blood_group: Some("O+".into()), ..mp_case() },
  )
  .await;
  approved(&s, NewCase { blood_group: Some("o+".into()), ..up_case() }).await;

  engine(&s).discover(mp.id, None).await.unwrap();
  let history = s
    .matches_for_anchor(MatchDirection::MpToUp.partner_kind(), mp.id, true)
    .await
    .unwrap();
  assert_eq!(history[0].score, 80);
  assert_eq!(history[0].match_type, MatchType::Matched);
}

#[tokio::test]
async fn gender_mismatch_creates_no_record_and_no_entry() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, NewCase { gender: Some("female".into()), ..up_case() }).await;

  let result = engine(&s).discover(mp.id, None).await.unwrap();
  assert!(result.newly_matched.is_empty());

  let history = s
    .matches_for_anchor(MatchDirection::MpToUp.partner_kind(), mp.id, true)
    .await
    .unwrap();
  assert!(history.is_empty());
}

#[tokio::test]
async fn low_nonzero_scores_are_persisted_but_not_displayed() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  // No gender on the candidate: the gender rule contributes nothing but
  // does not veto, leaving only the 30 age points — below display cutoff.
  approved(&s, NewCase { gender: None, ..up_case() }).await;

  let result = engine(&s).discover(mp.id, None).await.unwrap();
  assert!(result.newly_matched.is_empty());

  let history = s
    .matches_for_anchor(MatchDirection::MpToUp.partner_kind(), mp.id, true)
    .await
    .unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].score, 30);
  assert_eq!(history[0].match_type, MatchType::Potential);
}

#[tokio::test]
async fn second_sweep_creates_no_new_rows() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  approved(&s, NewCase { gender: None, ..up_case() }).await;

  engine(&s).discover(mp.id, None).await.unwrap();
  let after_first = s
    .matches_for_anchor(MatchDirection::MpToUp.partner_kind(), mp.id, true)
    .await
    .unwrap();

  let second = engine(&s).discover(mp.id, None).await.unwrap();
  let after_second = s
    .matches_for_anchor(MatchDirection::MpToUp.partner_kind(), mp.id, true)
    .await
    .unwrap();

  assert_eq!(after_first.len(), 2);
  assert_eq!(after_second.len(), 2);
  assert!(second.newly_matched.is_empty());

  let first_ids: Vec<&str> =
    after_first.iter().map(|m| m.match_id.as_str()).collect();
  let second_ids: Vec<&str> =
    after_second.iter().map(|m| m.match_id.as_str()).collect();
  assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn unapproved_or_missing_anchor_is_not_found() {
  let s = store().await;
  let unapproved = s.create_case(mp_case()).await.unwrap();

  let err = engine(&s).discover(unapproved.id, None).await.unwrap_err();
  assert!(matches!(err, CoreError::CaseNotFound(_)));

  let err = engine(&s).discover(Uuid::new_v4(), None).await.unwrap_err();
  assert!(matches!(err, CoreError::CaseNotFound(_)));
}

#[tokio::test]
async fn unapproved_candidates_stay_out_of_the_pool() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  // Candidate exists but was never approved.
  s.create_case(up_case()).await.unwrap();

  let result = engine(&s).discover(mp.id, None).await.unwrap();
  assert!(result.newly_matched.is_empty());
}

#[tokio::test]
async fn up_to_mp_direction_shares_history_with_mp_to_up() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let up = approved(&s, up_case()).await;

  engine(&s).discover(mp.id, None).await.unwrap();

  // Sweeping from the other side must not recreate the pair.
  let up_engine =
    MatchEngine::new(&s, MatchDirection::UpToMp, ScoringOptions::default());
  let result = up_engine.discover(up.id, None).await.unwrap();
  assert!(result.newly_matched.is_empty());

  let history = s
    .matches_for_anchor(MatchDirection::UpToMp.partner_kind(), up.id, false)
    .await
    .unwrap();
  assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn mp_to_ub_direction_uses_body_candidates() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(
    &s,
    NewCase {
      gender: Some("male".into()),
      age_range: Some("25-35".into()),
      ..blank_case(CaseKind::UnidentifiedBody)
    },
  )
  .await;
  // A live unidentified person must not enter the body sweep's pool.
  approved(&s, up_case()).await;

  let ub_engine =
    MatchEngine::new(&s, MatchDirection::MpToUb, ScoringOptions::default());
  let result = ub_engine.discover(mp.id, None).await.unwrap();
  assert_eq!(result.newly_matched.len(), 1);
  assert_eq!(
    result.newly_matched[0].person.kind,
    CaseKind::UnidentifiedBody
  );
}

// ─── Bucketing ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn history_buckets_are_disjoint_and_sorted() {
  let s = store().await;
  let mp = approved(
    &s,
    NewCase { blood_group: Some("O+".into()), ..mp_case() },
  )
  .await;
  // Three candidates at distinct scores: 80 (matched), 80 then rejected,
  // 55 then viewed.
  let strong_a = approved(
    &s,
    NewCase { blood_group: Some("O+".into()), ..up_case() },
  )
  .await;
  let strong_b = approved(
    &s,
    NewCase { blood_group: Some("o+".into()), ..up_case() },
  )
  .await;
  let weak = approved(&s, up_case()).await;

  let first = engine(&s).discover(mp.id, None).await.unwrap();
  assert_eq!(first.newly_matched.len(), 3);
  // Sorted by score descending.
  assert!(first.newly_matched[0].score >= first.newly_matched[1].score);
  assert!(first.newly_matched[1].score >= first.newly_matched[2].score);

  let reject_id = first
    .newly_matched
    .iter()
    .find(|e| e.person.id == strong_b.id)
    .unwrap()
    .match_id
    .clone();
  let viewed_id = first
    .newly_matched
    .iter()
    .find(|e| e.person.id == weak.id)
    .unwrap()
    .match_id
    .clone();

  engine(&s)
    .reject(mp.id, &reject_id, "different scar placement", None)
    .await
    .unwrap();
  mark_viewed(&s, &viewed_id, None).await.unwrap();

  let second = engine(&s).discover(mp.id, None).await.unwrap();
  assert!(second.newly_matched.is_empty());
  assert_eq!(second.previously_matched.len(), 1);
  assert_eq!(second.previously_matched[0].person.id, strong_a.id);
  assert_eq!(second.rejected.len(), 1);
  assert_eq!(
    second.rejected[0].reject_reason.as_deref(),
    Some("different scar placement")
  );
  assert_eq!(second.viewed.len(), 1);
  assert_eq!(second.viewed[0].person.id, weak.id);
  assert!(second.confirmed.is_empty());

  // Disjoint by match id across all buckets.
  let mut all_ids: Vec<&str> = second
    .previously_matched
    .iter()
    .chain(&second.viewed)
    .chain(&second.rejected)
    .chain(&second.confirmed)
    .map(|e| e.match_id.as_str())
    .collect();
  let before = all_ids.len();
  all_ids.sort();
  all_ids.dedup();
  assert_eq!(all_ids.len(), before);
}

#[tokio::test]
async fn unviewed_potentials_are_not_surfaced_in_history() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, NewCase { gender: None, ..up_case() }).await; // scores 30

  engine(&s).discover(mp.id, None).await.unwrap();
  let second = engine(&s).discover(mp.id, None).await.unwrap();

  assert!(second.newly_matched.is_empty());
  assert!(second.previously_matched.is_empty());
  assert!(second.viewed.is_empty());
  assert!(second.rejected.is_empty());
  assert!(second.confirmed.is_empty());
}

#[tokio::test]
async fn history_drops_pairs_whose_genders_no_longer_agree() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let up = approved(&s, up_case()).await;

  let match_id = discover_single(&s, mp.id).await;
  mark_viewed(&s, &match_id, None).await.unwrap();
  assert_eq!(engine(&s).discover(mp.id, None).await.unwrap().viewed.len(), 1);

  // The candidate's record is corrected after the match was recorded.
  s.update_case(up.id, reunite_core::case::CaseUpdate {
    gender: Some("female".into()),
    ..Default::default()
  })
  .await
  .unwrap();

  let result = engine(&s).discover(mp.id, None).await.unwrap();
  assert!(result.previously_matched.is_empty());
  assert!(result.viewed.is_empty());
}

// ─── Lifecycle: reject / unreject ────────────────────────────────────────────

/// Run a sweep and return the match id for the single expected pair.
async fn discover_single(s: &SqliteStore, mp: Uuid) -> String {
  let result = engine(s).discover(mp, None).await.unwrap();
  result.newly_matched[0].match_id.clone()
}

#[tokio::test]
async fn reject_requires_reason_and_updates_state() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  let err = engine(&s)
    .reject(mp.id, &match_id, "  ", None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::MissingField { field: "reject_reason" }));

  engine(&s)
    .reject(mp.id, &match_id, "not the same person", None)
    .await
    .unwrap();
  let m = s
    .find_match(MatchDirection::MpToUp.partner_kind(), mp.id, true, &match_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(m.match_type, MatchType::Rejected);
  assert_eq!(m.reject_reason.as_deref(), Some("not the same person"));
  assert!(!m.is_viewed);
}

#[tokio::test]
async fn reject_twice_is_refused() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  engine(&s)
    .reject(mp.id, &match_id, "first", None)
    .await
    .unwrap();
  let err = engine(&s)
    .reject(mp.id, &match_id, "second", None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::AlreadyTerminal(MatchType::Rejected)));
  assert_eq!(err.to_string(), "Match already rejected.");
}

#[tokio::test]
async fn reject_unknown_match_is_not_found() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let err = engine(&s)
    .reject(mp.id, "MATCH-20250101-ZZZZ", "reason", None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::MatchNotFound));
}

#[tokio::test]
async fn unreject_reverts_to_chosen_state() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  engine(&s)
    .reject(mp.id, &match_id, "mistake", None)
    .await
    .unwrap();
  let restored = engine(&s)
    .unreject(mp.id, &match_id, "matched", "reviewed again", None)
    .await
    .unwrap();
  assert_eq!(restored, MatchType::Matched);

  let m = s
    .find_match(MatchDirection::MpToUp.partner_kind(), mp.id, true, &match_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(m.match_type, MatchType::Matched);
  assert!(m.reject_reason.is_none());
  assert_eq!(m.unreject_reason.as_deref(), Some("reviewed again"));
  assert!(m.is_viewed);
}

#[tokio::test]
async fn unreject_guards_state_and_inputs() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  // Not rejected yet.
  let err = engine(&s)
    .unreject(mp.id, &match_id, "matched", "reason", None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotRejected(_)));

  engine(&s)
    .reject(mp.id, &match_id, "r", None)
    .await
    .unwrap();

  // Bad target state.
  let err = engine(&s)
    .unreject(mp.id, &match_id, "confirmed", "reason", None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::InvalidRevertStatus));

  // Missing reason.
  let err = engine(&s)
    .unreject(mp.id, &match_id, "potential", "", None)
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    CoreError::MissingField { field: "unreject_reason" }
  ));
}

// ─── Lifecycle: confirm / unconfirm ──────────────────────────────────────────

#[tokio::test]
async fn confirm_resolves_both_cases_reciprocally() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let up = approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  engine(&s)
    .confirm(mp.id, &match_id, Some("family identified belongings".into()), None)
    .await
    .unwrap();

  let m = s
    .find_match(MatchDirection::MpToUp.partner_kind(), mp.id, true, &match_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(m.match_type, MatchType::Confirmed);
  assert_eq!(m.match_with, Some(CaseKind::UnidentifiedPerson));
  assert!(!m.is_viewed);

  let mp_after = s.get_case(mp.id).await.unwrap().unwrap();
  let up_after = s.get_case(up.id).await.unwrap().unwrap();
  assert_eq!(mp_after.case_status, CaseStatus::Resolved);
  assert_eq!(up_after.case_status, CaseStatus::Resolved);
  assert_eq!(mp_after.matched_person_id, Some(up.id));
  assert_eq!(up_after.matched_person_id, Some(mp.id));
  assert_eq!(mp_after.matched_case_id, up_after.case_id);
  assert_eq!(up_after.matched_case_id, mp_after.case_id);
  assert_eq!(mp_after.match_with, Some(CaseKind::UnidentifiedPerson));
  assert_eq!(up_after.match_with, Some(CaseKind::MissingPerson));
}

#[tokio::test]
async fn confirm_twice_is_refused() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  engine(&s).confirm(mp.id, &match_id, None, None).await.unwrap();
  let err = engine(&s)
    .confirm(mp.id, &match_id, None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::AlreadyTerminal(MatchType::Confirmed)));
}

#[tokio::test]
async fn confirm_is_refused_while_either_side_is_resolved() {
  let s = store().await;
  let mp = approved(
    &s,
    NewCase { blood_group: Some("O+".into()), ..mp_case() },
  )
  .await;
  approved(&s, up_case()).await;
  approved(&s, NewCase { blood_group: Some("O+".into()), ..up_case() }).await;

  let first = engine(&s).discover(mp.id, None).await.unwrap();
  assert_eq!(first.newly_matched.len(), 2);
  let first_id = first.newly_matched[0].match_id.clone();
  let second_id = first.newly_matched[1].match_id.clone();

  engine(&s).confirm(mp.id, &first_id, None, None).await.unwrap();

  // The MP already resolved through the first pairing.
  let err = engine(&s)
    .confirm(mp.id, &second_id, None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::CaseAlreadyResolved { .. }));
}

#[tokio::test]
async fn unconfirm_reverts_both_cases_and_the_match() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let up = approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  engine(&s)
    .confirm(mp.id, &match_id, Some("note".into()), None)
    .await
    .unwrap();
  let restored = engine(&s)
    .unconfirm(mp.id, up.id, "potential", "identification withdrawn", None)
    .await
    .unwrap();
  assert_eq!(restored, MatchType::Potential);

  let m = s
    .find_match(MatchDirection::MpToUp.partner_kind(), mp.id, true, &match_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(m.match_type, MatchType::Potential);
  assert!(m.confirmation_note.is_none());
  assert_eq!(m.unconfirm_reason.as_deref(), Some("identification withdrawn"));
  assert!(m.is_viewed);

  for id in [mp.id, up.id] {
    let case = s.get_case(id).await.unwrap().unwrap();
    assert_eq!(case.case_status, CaseStatus::Pending);
    assert!(case.match_with.is_none());
    assert!(case.matched_person_id.is_none());
    assert!(case.matched_case_id.is_none());
  }
}

#[tokio::test]
async fn unconfirm_requires_a_confirmed_match() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let up = approved(&s, up_case()).await;
  discover_single(&s, mp.id).await;

  let err = engine(&s)
    .unconfirm(mp.id, up.id, "matched", "reason", None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::NotConfirmed(MatchType::Potential)));

  // Unknown partner id.
  let err = engine(&s)
    .unconfirm(mp.id, Uuid::new_v4(), "matched", "reason", None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::MatchNotFound));
}

#[tokio::test]
async fn confirm_then_unconfirm_allows_reconfirmation() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  let up = approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  engine(&s).confirm(mp.id, &match_id, None, None).await.unwrap();
  engine(&s)
    .unconfirm(mp.id, up.id, "matched", "new evidence", None)
    .await
    .unwrap();
  // Both sides are pending again, so a fresh confirmation must succeed.
  engine(&s).confirm(mp.id, &match_id, None, None).await.unwrap();

  let mp_after = s.get_case(mp.id).await.unwrap().unwrap();
  assert_eq!(mp_after.case_status, CaseStatus::Resolved);
}

#[tokio::test]
async fn rejected_match_cannot_be_confirmed_directly() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  engine(&s)
    .reject(mp.id, &match_id, "wrong person", None)
    .await
    .unwrap();
  let err = engine(&s)
    .confirm(mp.id, &match_id, None, None)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::AlreadyTerminal(MatchType::Rejected)));
}

// ─── Mark viewed ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn mark_viewed_is_global_and_idempotent() {
  let s = store().await;
  let mp = approved(&s, mp_case()).await;
  approved(&s, up_case()).await;
  let match_id = discover_single(&s, mp.id).await;

  mark_viewed(&s, &match_id, None).await.unwrap();
  mark_viewed(&s, &match_id, None).await.unwrap();

  let m = s
    .find_match(MatchDirection::MpToUp.partner_kind(), mp.id, true, &match_id)
    .await
    .unwrap()
    .unwrap();
  assert!(m.is_viewed);

  let err = mark_viewed(&s, "MATCH-20250101-ZZZZ", None).await.unwrap_err();
  assert!(matches!(err, CoreError::MatchNotFound));
}

// ─── Users ───────────────────────────────────────────────────────────────────

fn new_user(email: &str) -> NewUser {
  NewUser {
    first_name: "Asha".into(),
    last_name: "Kulkarni".into(),
    email: email.into(),
    phone_no: None,
    role: UserRole::Police,
    status: UserStatus::Pending,
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
  }
}

#[tokio::test]
async fn duplicate_user_email_is_refused() {
  let s = store().await;
  let first = s.create_user(new_user("a@example.org")).await.unwrap();
  assert!(first.is_some());
  let second = s.create_user(new_user("a@example.org")).await.unwrap();
  assert!(second.is_none());
}

#[tokio::test]
async fn user_status_moderation_roundtrip() {
  let s = store().await;
  let user = s
    .create_user(new_user("b@example.org"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(user.status, UserStatus::Pending);

  assert!(
    s.set_user_status(user.id, UserStatus::Approved)
      .await
      .unwrap()
  );
  let fetched = s.get_user_by_email("b@example.org").await.unwrap().unwrap();
  assert_eq!(fetched.status, UserStatus::Approved);

  let pending = s.list_users(Some(UserStatus::Pending)).await.unwrap();
  assert!(pending.is_empty());
}

// ─── Directory ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn hospital_crud_roundtrip() {
  let s = store().await;
  let hospital = s
    .create_hospital(
      NewHospital {
        name: "Sassoon General".into(),
        hospital_type: Some("government".into()),
        address_id: None,
        active: true,
      },
      None,
    )
    .await
    .unwrap();

  let fetched = s.get_hospital(hospital.id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Sassoon General");

  assert_eq!(s.list_hospitals().await.unwrap().len(), 1);
  assert!(s.delete_hospital(hospital.id).await.unwrap());
  assert!(s.get_hospital(hospital.id).await.unwrap().is_none());
}
