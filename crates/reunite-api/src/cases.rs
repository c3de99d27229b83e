//! Handlers for `/cases` endpoints: intake, listing, moderation, and the
//! demographic supplement.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use reunite_core::{
  case::{
    AdditionalInfo, ApproveStatus, CaseKind, CaseRecord, CaseStatus,
    CaseUpdate, NewCase,
  },
  store::CaseQuery,
};

use crate::{AppState, AppStore, auth::CurrentUser, error::ApiError};

fn case_not_found() -> ApiError {
  ApiError::NotFound("Case not found.".into())
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /cases`: the intake fields plus an optional
/// demographic supplement stored alongside the case.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(flatten)]
  pub case: NewCase,
  pub additional_info: Option<AdditionalInfo>,
}

/// `POST /cases` — returns 201 + the stored case with its allocated
/// `case_id`.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let mut input = body.case;
  input.created_by = Some(user.id);

  let case = state
    .store
    .create_case(input)
    .await
    .map_err(ApiError::store)?;

  if let Some(info) = body.additional_info {
    state
      .store
      .upsert_additional_info(case.id, info)
      .await
      .map_err(ApiError::store)?;
  }

  tracing::info!(case = %case.id, case_id = ?case.case_id, "case created");
  Ok((StatusCode::CREATED, Json(case)))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /cases/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CaseRecord>, ApiError>
where
  S: AppStore,
{
  let case = state
    .store
    .get_case(id)
    .await
    .map_err(ApiError::store)?
    .filter(|c| !c.deleted)
    .ok_or_else(case_not_found)?;
  Ok(Json(case))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub kind:           Option<CaseKind>,
  pub case_status:    Option<CaseStatus>,
  pub approve_status: Option<ApproveStatus>,
  pub city:           Option<String>,
  pub limit:          Option<usize>,
  pub offset:         Option<usize>,
}

/// `GET /cases[?kind=&case_status=&approve_status=&city=&limit=&offset=]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<CaseRecord>>, ApiError>
where
  S: AppStore,
{
  let query = CaseQuery {
    kind: params.kind,
    case_status: params.case_status,
    approve_status: params.approve_status,
    city: params.city,
    limit: params.limit,
    offset: params.offset,
  };
  let cases = state
    .store
    .list_cases(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(cases))
}

// ─── Update / delete ──────────────────────────────────────────────────────────

/// `PUT /cases/:id` — partial update of the intake fields.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
  Json(mut body): Json<CaseUpdate>,
) -> Result<Json<CaseRecord>, ApiError>
where
  S: AppStore,
{
  body.updated_by = Some(user.id);
  let case = state
    .store
    .update_case(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(case_not_found)?;
  Ok(Json(case))
}

/// `DELETE /cases/:id` — soft delete; the record drops out of listings and
/// matching pools but stays referenceable from match history.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state
    .store
    .soft_delete_case(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(case_not_found());
  }
  Ok(Json(json!({ "message": "Case deleted successfully." })))
}

// ─── Moderation ───────────────────────────────────────────────────────────────

async fn moderate<S>(
  state: &AppState<S>,
  id: Uuid,
  user: CurrentUser,
  status: ApproveStatus,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  user.require_admin()?;
  if !state
    .store
    .set_approve_status(id, status, Some(user.id))
    .await
    .map_err(ApiError::store)?
  {
    return Err(case_not_found());
  }
  tracing::info!(case = %id, status = ?status, "case moderated");
  Ok(Json(json!({ "message": "Case status updated." })))
}

/// `POST /cases/:id/approve` — admin only; approval is what admits a case
/// into the matching pools.
pub async fn approve<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  moderate(&state, id, user, ApproveStatus::Approved).await
}

/// `POST /cases/:id/reject` — admin only.
pub async fn reject<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  moderate(&state, id, user, ApproveStatus::Rejected).await
}

/// `POST /cases/:id/hold` — admin only.
pub async fn hold<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  moderate(&state, id, user, ApproveStatus::OnHold).await
}

// ─── Additional info ──────────────────────────────────────────────────────────

/// `GET /cases/:id/additional-info`
pub async fn get_additional_info<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<AdditionalInfo>, ApiError>
where
  S: AppStore,
{
  let info = state
    .store
    .additional_info(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Additional info not found.".into()))?;
  Ok(Json(info))
}

/// `PUT /cases/:id/additional-info` — create or replace the supplement.
pub async fn put_additional_info<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
  Json(info): Json<AdditionalInfo>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  // The case must exist and be live.
  state
    .store
    .get_case(id)
    .await
    .map_err(ApiError::store)?
    .filter(|c| !c.deleted)
    .ok_or_else(case_not_found)?;

  state
    .store
    .upsert_additional_info(id, info)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "message": "Additional info saved." })))
}
