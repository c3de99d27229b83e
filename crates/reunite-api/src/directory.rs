//! Handlers for the directory entities: hospitals, police stations,
//! volunteers, documents, FIRs, addresses, and contacts.
//!
//! Thin row CRUD. Reads are open; writes require an authenticated user,
//! who is stamped into the audit columns.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use reunite_core::directory::{
  Address, Contact, Document, Fir, Hospital, NewAddress, NewContact,
  NewDocument, NewFir, NewHospital, NewPoliceStation, NewVolunteer,
  PoliceStation, Volunteer,
};

use crate::{AppState, AppStore, auth::CurrentUser, error::ApiError};

/// `?person_id=` filter shared by the case-linked entities.
#[derive(Debug, Deserialize)]
pub struct PersonFilter {
  pub person_id: Option<Uuid>,
}

fn not_found(entity: &str) -> ApiError {
  ApiError::NotFound(format!("{entity} not found."))
}

fn deleted(entity: &str) -> Json<serde_json::Value> {
  Json(json!({ "message": format!("{entity} deleted successfully.") }))
}

// ─── Hospitals ────────────────────────────────────────────────────────────────

/// `POST /hospitals`
pub async fn create_hospital<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewHospital>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let hospital = state
    .store
    .create_hospital(body, Some(user.id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(hospital)))
}

/// `GET /hospitals`
pub async fn list_hospitals<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Hospital>>, ApiError>
where
  S: AppStore,
{
  Ok(Json(
    state.store.list_hospitals().await.map_err(ApiError::store)?,
  ))
}

/// `GET /hospitals/:id`
pub async fn get_hospital<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Hospital>, ApiError>
where
  S: AppStore,
{
  state
    .store
    .get_hospital(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found("Hospital"))
}

/// `DELETE /hospitals/:id`
pub async fn delete_hospital<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state
    .store
    .delete_hospital(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(not_found("Hospital"));
  }
  Ok(deleted("Hospital"))
}

// ─── Police stations ──────────────────────────────────────────────────────────

/// `POST /police-stations`
pub async fn create_police_station<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewPoliceStation>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let station = state
    .store
    .create_police_station(body, Some(user.id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(station)))
}

/// `GET /police-stations`
pub async fn list_police_stations<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<PoliceStation>>, ApiError>
where
  S: AppStore,
{
  Ok(Json(
    state
      .store
      .list_police_stations()
      .await
      .map_err(ApiError::store)?,
  ))
}

/// `GET /police-stations/:id`
pub async fn get_police_station<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PoliceStation>, ApiError>
where
  S: AppStore,
{
  state
    .store
    .get_police_station(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found("Police station"))
}

/// `DELETE /police-stations/:id`
pub async fn delete_police_station<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state
    .store
    .delete_police_station(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(not_found("Police station"));
  }
  Ok(deleted("Police station"))
}

// ─── Volunteers ───────────────────────────────────────────────────────────────

/// `POST /volunteers`
pub async fn create_volunteer<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewVolunteer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let volunteer = state
    .store
    .create_volunteer(body, Some(user.id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(volunteer)))
}

/// `GET /volunteers`
pub async fn list_volunteers<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Volunteer>>, ApiError>
where
  S: AppStore,
{
  Ok(Json(
    state.store.list_volunteers().await.map_err(ApiError::store)?,
  ))
}

/// `GET /volunteers/:id`
pub async fn get_volunteer<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Volunteer>, ApiError>
where
  S: AppStore,
{
  state
    .store
    .get_volunteer(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found("Volunteer"))
}

/// `DELETE /volunteers/:id`
pub async fn delete_volunteer<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state
    .store
    .delete_volunteer(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(not_found("Volunteer"));
  }
  Ok(deleted("Volunteer"))
}

// ─── Documents ────────────────────────────────────────────────────────────────

/// `POST /documents`
pub async fn create_document<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewDocument>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let document = state
    .store
    .create_document(body, Some(user.id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(document)))
}

/// `GET /documents[?person_id=]`
pub async fn list_documents<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<PersonFilter>,
) -> Result<Json<Vec<Document>>, ApiError>
where
  S: AppStore,
{
  Ok(Json(
    state
      .store
      .list_documents(filter.person_id)
      .await
      .map_err(ApiError::store)?,
  ))
}

/// `GET /documents/:id`
pub async fn get_document<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Document>, ApiError>
where
  S: AppStore,
{
  state
    .store
    .get_document(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found("Document"))
}

/// `DELETE /documents/:id`
pub async fn delete_document<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state
    .store
    .delete_document(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(not_found("Document"));
  }
  Ok(deleted("Document"))
}

// ─── FIRs ─────────────────────────────────────────────────────────────────────

/// `POST /firs`
pub async fn create_fir<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewFir>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let fir = state
    .store
    .create_fir(body, Some(user.id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(fir)))
}

/// `GET /firs[?person_id=]`
pub async fn list_firs<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<PersonFilter>,
) -> Result<Json<Vec<Fir>>, ApiError>
where
  S: AppStore,
{
  Ok(Json(
    state
      .store
      .list_firs(filter.person_id)
      .await
      .map_err(ApiError::store)?,
  ))
}

/// `GET /firs/:id`
pub async fn get_fir<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Fir>, ApiError>
where
  S: AppStore,
{
  state
    .store
    .get_fir(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found("FIR"))
}

/// `DELETE /firs/:id`
pub async fn delete_fir<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state.store.delete_fir(id).await.map_err(ApiError::store)? {
    return Err(not_found("FIR"));
  }
  Ok(deleted("FIR"))
}

// ─── Addresses ────────────────────────────────────────────────────────────────

/// `POST /addresses`
pub async fn create_address<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewAddress>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let address = state
    .store
    .create_address(body, Some(user.id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(address)))
}

/// `GET /addresses[?person_id=]`
pub async fn list_addresses<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<PersonFilter>,
) -> Result<Json<Vec<Address>>, ApiError>
where
  S: AppStore,
{
  Ok(Json(
    state
      .store
      .list_addresses(filter.person_id)
      .await
      .map_err(ApiError::store)?,
  ))
}

/// `GET /addresses/:id`
pub async fn get_address<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Address>, ApiError>
where
  S: AppStore,
{
  state
    .store
    .get_address(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found("Address"))
}

/// `DELETE /addresses/:id`
pub async fn delete_address<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state
    .store
    .delete_address(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(not_found("Address"));
  }
  Ok(deleted("Address"))
}

// ─── Contacts ─────────────────────────────────────────────────────────────────

/// `POST /contacts`
pub async fn create_contact<S>(
  State(state): State<AppState<S>>,
  user: CurrentUser,
  Json(body): Json<NewContact>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AppStore,
{
  let contact = state
    .store
    .create_contact(body, Some(user.id))
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(contact)))
}

/// `GET /contacts[?person_id=]`
pub async fn list_contacts<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<PersonFilter>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: AppStore,
{
  Ok(Json(
    state
      .store
      .list_contacts(filter.person_id)
      .await
      .map_err(ApiError::store)?,
  ))
}

/// `GET /contacts/:id`
pub async fn get_contact<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Contact>, ApiError>
where
  S: AppStore,
{
  state
    .store
    .get_contact(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found("Contact"))
}

/// `DELETE /contacts/:id`
pub async fn delete_contact<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  _user: CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: AppStore,
{
  if !state
    .store
    .delete_contact(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(not_found("Contact"));
  }
  Ok(deleted("Contact"))
}
