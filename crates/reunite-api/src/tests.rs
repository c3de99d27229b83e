//! Router-level tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use reunite_core::{
  case::{ApproveStatus, CaseKind, CaseStatus, NewCase},
  score::ScoringOptions,
  store::{CaseStore, MatchStore, UserStore},
  user::{NewUser, UserRole, UserStatus},
};
use reunite_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{AppState, api_router, auth::hash_password};

const ADMIN_EMAIL: &str = "admin@example.org";
const POLICE_EMAIL: &str = "officer@example.org";
const PASSWORD: &str = "secret";

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for (email, role) in
    [(ADMIN_EMAIL, UserRole::Admin), (POLICE_EMAIL, UserRole::Police)]
  {
    store
      .create_user(NewUser {
        first_name: "Test".into(),
        last_name: "User".into(),
        email: email.into(),
        phone_no: None,
        role,
        status: UserStatus::Approved,
        password_hash: hash_password(PASSWORD).unwrap(),
      })
      .await
      .unwrap()
      .unwrap();
  }
  AppState::new(Arc::new(store), ScoringOptions::default())
}

fn auth_header(email: &str) -> String {
  format!("Basic {}", B64.encode(format!("{email}:{PASSWORD}")))
}

async fn request(
  state: AppState<SqliteStore>,
  method: &str,
  uri: &str,
  auth: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(email) = auth {
    builder = builder.header(header::AUTHORIZATION, auth_header(email));
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = api_router(state).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes)
      .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
  };
  (status, value)
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

/// Seed an approved case straight through the store.
async fn seed_case(
  state: &AppState<SqliteStore>,
  input: NewCase,
) -> reunite_core::case::CaseRecord {
  let case = state.store.create_case(input).await.unwrap();
  state
    .store
    .set_approve_status(case.id, ApproveStatus::Approved, None)
    .await
    .unwrap();
  state.store.get_case(case.id).await.unwrap().unwrap()
}

fn mp_case() -> NewCase {
  NewCase {
    gender: Some("male".into()),
    age: Some(30),
    ..blank_case(CaseKind::MissingPerson)
  }
}

fn up_case() -> NewCase {
  NewCase {
    gender: Some("male".into()),
    age_range: Some("25-35".into()),
    ..blank_case(CaseKind::UnidentifiedPerson)
  }
}

/// Seed an MP/UP pair and return (mp, match_id) after one sweep.
async fn seed_pair(state: &AppState<SqliteStore>) -> (Uuid, String) {
  let mp = seed_case(state, mp_case()).await;
  seed_case(state, up_case()).await;
  let (status, body) = request(
    state.clone(),
    "GET",
    &format!("/missing-person-with-ups/{}", mp.id),
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  let match_id = body["newly_matched"][0]["match_id"]
    .as_str()
    .unwrap()
    .to_string();
  (mp.id, match_id)
}

// ─── Discovery ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn discovery_is_anonymous_and_returns_buckets_and_anchor() {
  let state = make_state().await;
  let mp = seed_case(&state, mp_case()).await;
  seed_case(&state, up_case()).await;

  let (status, body) = request(
    state.clone(),
    "GET",
    &format!("/missing-person-with-ups/{}", mp.id),
    None,
    None,
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["newly_matched"].as_array().unwrap().len(), 1);
  assert_eq!(body["newly_matched"][0]["score"], 55);
  assert!(body["newly_matched"][0]["match_id"]
    .as_str()
    .unwrap()
    .starts_with("MATCH-"));
  assert!(body["previously_matched"].as_array().unwrap().is_empty());
  assert!(body["viewed"].as_array().unwrap().is_empty());
  assert!(body["rejected"].as_array().unwrap().is_empty());
  assert!(body["confirmed"].as_array().unwrap().is_empty());
  assert_eq!(body["missing_person"]["id"], json!(mp.id));
}

#[tokio::test]
async fn discovery_worked_example_clamps_at_100() {
  let state = make_state().await;
  let mp = seed_case(
    &state,
    NewCase {
      blood_group: Some("O+".into()),
      height: Some(175),
      ..mp_case()
    },
  )
  .await;
  seed_case(
    &state,
    NewCase {
      blood_group: Some("O+".into()),
      height: Some(178),
      ..up_case()
    },
  )
  .await;

  let (_, body) = request(
    state.clone(),
    "GET",
    &format!("/missing-person-with-ups/{}", mp.id),
    None,
    None,
  )
  .await;
  assert_eq!(body["newly_matched"][0]["score"], 100);
}

#[tokio::test]
async fn discovery_excludes_gender_mismatches_entirely() {
  let state = make_state().await;
  let mp = seed_case(&state, mp_case()).await;
  seed_case(
    &state,
    NewCase { gender: Some("female".into()), ..up_case() },
  )
  .await;

  let (status, body) = request(
    state.clone(),
    "GET",
    &format!("/missing-person-with-ups/{}", mp.id),
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["newly_matched"].as_array().unwrap().is_empty());

  let history = state
    .store
    .matches_for_anchor(
      reunite_core::matching::PartnerKind::UnidentifiedPerson,
      mp.id,
      true,
    )
    .await
    .unwrap();
  assert!(history.is_empty());
}

#[tokio::test]
async fn discovery_of_unknown_or_unapproved_anchor_is_404() {
  let state = make_state().await;
  let unapproved = state.store.create_case(mp_case()).await.unwrap();

  for id in [unapproved.id, Uuid::new_v4()] {
    let (status, body) = request(
      state.clone(),
      "GET",
      &format!("/missing-person-with-ups/{id}"),
      None,
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Missing person not found.");
  }
}

#[tokio::test]
async fn discovery_records_acting_user_when_authenticated() {
  let state = make_state().await;
  let mp = seed_case(&state, mp_case()).await;
  seed_case(&state, up_case()).await;

  request(
    state.clone(),
    "GET",
    &format!("/missing-person-with-ups/{}", mp.id),
    Some(POLICE_EMAIL),
    None,
  )
  .await;

  let history = state
    .store
    .matches_for_anchor(
      reunite_core::matching::PartnerKind::UnidentifiedPerson,
      mp.id,
      true,
    )
    .await
    .unwrap();
  assert!(history[0].created_by.is_some());
}

// ─── Lifecycle over HTTP ──────────────────────────────────────────────────────

#[tokio::test]
async fn lifecycle_posts_require_authentication() {
  let state = make_state().await;
  let (mp, match_id) = seed_pair(&state).await;

  let (status, _) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-reject"),
    None,
    Some(json!({ "match_id": match_id, "reject_reason": "r" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reject_validates_fields_and_transitions() {
  let state = make_state().await;
  let (mp, match_id) = seed_pair(&state).await;

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-reject"),
    Some(POLICE_EMAIL),
    Some(json!({ "reject_reason": "r" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "match_id is required.");

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-reject"),
    Some(POLICE_EMAIL),
    Some(json!({ "match_id": match_id })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "reject_reason is required.");

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-reject"),
    Some(POLICE_EMAIL),
    Some(json!({ "match_id": match_id, "reject_reason": "not them" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Match rejected successfully.");

  // Second reject refused with the state named.
  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-reject"),
    Some(POLICE_EMAIL),
    Some(json!({ "match_id": match_id, "reject_reason": "again" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Match already rejected.");
}

#[tokio::test]
async fn unreject_validates_new_status() {
  let state = make_state().await;
  let (mp, match_id) = seed_pair(&state).await;

  request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-reject"),
    Some(POLICE_EMAIL),
    Some(json!({ "match_id": match_id, "reject_reason": "r" })),
  )
  .await;

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-unreject"),
    Some(POLICE_EMAIL),
    Some(json!({
      "match_id": match_id,
      "new_status": "confirmed",
      "unreject_reason": "u"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Invalid new_status. Use 'matched' or 'potential'.");

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-unreject"),
    Some(POLICE_EMAIL),
    Some(json!({
      "match_id": match_id,
      "new_status": "potential",
      "unreject_reason": "second look"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body["message"],
    "Match status reverted to 'potential' successfully."
  );
}

#[tokio::test]
async fn confirm_and_unconfirm_roundtrip_over_http() {
  let state = make_state().await;
  let mp = seed_case(&state, mp_case()).await;
  let up = seed_case(&state, up_case()).await;
  let (_, body) = request(
    state.clone(),
    "GET",
    &format!("/missing-person-with-ups/{}", mp.id),
    None,
    None,
  )
  .await;
  let match_id = body["newly_matched"][0]["match_id"].as_str().unwrap();

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{}/match-confirm", mp.id),
    Some(POLICE_EMAIL),
    Some(json!({
      "match_id": match_id,
      "confirmation_note": "identified by family"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Match confirmed successfully.");

  let mp_after = state.store.get_case(mp.id).await.unwrap().unwrap();
  let up_after = state.store.get_case(up.id).await.unwrap().unwrap();
  assert_eq!(mp_after.case_status, CaseStatus::Resolved);
  assert_eq!(up_after.case_status, CaseStatus::Resolved);
  assert_eq!(mp_after.matched_person_id, Some(up.id));

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{}/match-unconfirm", mp.id),
    Some(POLICE_EMAIL),
    Some(json!({
      "matched_person_id": up.id,
      "new_status": "matched",
      "unconfirm_reason": "identification withdrawn"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body["message"],
    "Match unconfirmed. Status reverted to 'matched'."
  );

  let mp_after = state.store.get_case(mp.id).await.unwrap().unwrap();
  assert_eq!(mp_after.case_status, CaseStatus::Pending);
  assert!(mp_after.matched_person_id.is_none());
}

#[tokio::test]
async fn unconfirm_requires_partner_id() {
  let state = make_state().await;
  let (mp, _) = seed_pair(&state).await;

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/missing-person-with-ups/{mp}/match-unconfirm"),
    Some(POLICE_EMAIL),
    Some(json!({ "new_status": "matched", "unconfirm_reason": "r" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "matched_person_id is required.");
}

#[tokio::test]
async fn mark_viewed_is_global_and_404s_on_unknown_ids() {
  let state = make_state().await;
  let (_, match_id) = seed_pair(&state).await;

  let (status, body) = request(
    state.clone(),
    "POST",
    &format!("/matches/{match_id}/mark-viewed"),
    Some(POLICE_EMAIL),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, Value::String("status changed successfully".into()));

  let (status, _) = request(
    state.clone(),
    "POST",
    "/matches/MATCH-20250101-ZZZZ/mark-viewed",
    Some(POLICE_EMAIL),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Cases over HTTP ──────────────────────────────────────────────────────────

#[tokio::test]
async fn case_creation_allocates_case_id() {
  let state = make_state().await;
  let (status, body) = request(
    state.clone(),
    "POST",
    "/cases",
    Some(POLICE_EMAIL),
    Some(json!({
      "kind": "missing_person",
      "full_name": "Ramesh Patil",
      "gender": "male",
      "age": 41,
      "city": "Pune"
    })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  let case_id = body["case_id"].as_str().unwrap();
  assert!(case_id.starts_with("MP-"), "{case_id}");
  assert!(case_id.contains("-PUNE-"));
  assert_eq!(body["approve_status"], "pending");
}

#[tokio::test]
async fn case_creation_requires_auth() {
  let state = make_state().await;
  let (status, _) = request(
    state.clone(),
    "POST",
    "/cases",
    None,
    Some(json!({ "kind": "missing_person" })),
  )
  .await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn case_moderation_is_admin_only() {
  let state = make_state().await;
  let case = state.store.create_case(mp_case()).await.unwrap();

  let (status, _) = request(
    state.clone(),
    "POST",
    &format!("/cases/{}/approve", case.id),
    Some(POLICE_EMAIL),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, _) = request(
    state.clone(),
    "POST",
    &format!("/cases/{}/approve", case.id),
    Some(ADMIN_EMAIL),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let approved = state.store.get_case(case.id).await.unwrap().unwrap();
  assert_eq!(approved.approve_status, ApproveStatus::Approved);
}

#[tokio::test]
async fn deleted_case_returns_404() {
  let state = make_state().await;
  let case = seed_case(&state, mp_case()).await;

  let (status, _) = request(
    state.clone(),
    "DELETE",
    &format!("/cases/{}", case.id),
    Some(POLICE_EMAIL),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = request(
    state.clone(),
    "GET",
    &format!("/cases/{}", case.id),
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Case not found.");
}

#[tokio::test]
async fn additional_info_roundtrip() {
  let state = make_state().await;
  let case = seed_case(&state, mp_case()).await;

  let (status, _) = request(
    state.clone(),
    "PUT",
    &format!("/cases/{}/additional-info", case.id),
    Some(POLICE_EMAIL),
    Some(json!({
      "caste": "open",
      "religion": "hindu",
      "other_known_languages": ["marathi", "hindi"]
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = request(
    state.clone(),
    "GET",
    &format!("/cases/{}/additional-info", case.id),
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["religion"], "hindu");
  assert_eq!(body["other_known_languages"][0], "marathi");
}

// ─── Users over HTTP ──────────────────────────────────────────────────────────

#[tokio::test]
async fn registration_and_approval_flow() {
  let state = make_state().await;

  let (status, body) = request(
    state.clone(),
    "POST",
    "/users/register",
    None,
    Some(json!({
      "first_name": "Meera",
      "last_name": "Shah",
      "email": "meera@example.org",
      "role": "family",
      "password": "hunter2"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert!(body.get("password_hash").is_none());
  let new_id = body["id"].as_str().unwrap().to_string();

  // Duplicate email refused.
  let (status, body) = request(
    state.clone(),
    "POST",
    "/users/register",
    None,
    Some(json!({
      "first_name": "Meera",
      "last_name": "Shah",
      "email": "meera@example.org",
      "password": "hunter2"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Email already registered.");

  // Pending accounts cannot authenticate.
  let mut builder = Request::builder().method("GET").uri("/users/me");
  builder = builder.header(
    header::AUTHORIZATION,
    format!("Basic {}", B64.encode("meera@example.org:hunter2")),
  );
  let resp = api_router(state.clone())
    .oneshot(builder.body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  // Admin approves; authentication now works.
  let (status, _) = request(
    state.clone(),
    "POST",
    &format!("/users/{new_id}/approve"),
    Some(ADMIN_EMAIL),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let mut builder = Request::builder().method("GET").uri("/users/me");
  builder = builder.header(
    header::AUTHORIZATION,
    format!("Basic {}", B64.encode("meera@example.org:hunter2")),
  );
  let resp = api_router(state.clone())
    .oneshot(builder.body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn self_registration_cannot_claim_admin() {
  let state = make_state().await;
  let (status, body) = request(
    state.clone(),
    "POST",
    "/users/register",
    None,
    Some(json!({
      "first_name": "Eve",
      "last_name": "Adams",
      "email": "eve@example.org",
      "role": "admin",
      "password": "pw"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(body["role"], "reporting");
}

#[tokio::test]
async fn user_listing_is_admin_only() {
  let state = make_state().await;

  let (status, _) =
    request(state.clone(), "GET", "/users", Some(POLICE_EMAIL), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, body) =
    request(state.clone(), "GET", "/users", Some(ADMIN_EMAIL), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 2);
}

// ─── Directory over HTTP ──────────────────────────────────────────────────────

#[tokio::test]
async fn hospital_crud_over_http() {
  let state = make_state().await;

  let (status, body) = request(
    state.clone(),
    "POST",
    "/hospitals",
    Some(POLICE_EMAIL),
    Some(json!({ "name": "Sassoon General", "hospital_type": "government" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = body["id"].as_str().unwrap().to_string();

  let (status, body) =
    request(state.clone(), "GET", "/hospitals", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 1);

  let (status, _) = request(
    state.clone(),
    "DELETE",
    &format!("/hospitals/{id}"),
    Some(POLICE_EMAIL),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = request(
    state.clone(),
    "GET",
    &format!("/hospitals/{id}"),
    None,
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
