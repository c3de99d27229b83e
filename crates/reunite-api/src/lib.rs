//! JSON REST API for Reunite.
//!
//! Exposes an axum [`Router`] backed by any store implementing the four
//! `reunite_core` store traits. TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", reunite_api::api_router(state))
//! ```

pub mod auth;
pub mod cases;
pub mod directory;
pub mod error;
pub mod matching;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};

use reunite_core::{
  matching::MatchDirection,
  score::ScoringOptions,
  store::{CaseStore, DirectoryStore, MatchStore, UserStore},
};

pub use error::ApiError;

// ─── Store bound ─────────────────────────────────────────────────────────────

/// The combined store bound the API needs: every trait implemented with one
/// shared error type. Blanket-implemented; backends never name this trait.
pub trait AppStore:
  CaseStore<Error = Self::StoreError>
  + MatchStore<Error = Self::StoreError>
  + DirectoryStore<Error = Self::StoreError>
  + UserStore<Error = Self::StoreError>
  + Send
  + Sync
  + 'static
{
  type StoreError: std::error::Error + Send + Sync + 'static;
}

impl<T, E> AppStore for T
where
  T: CaseStore<Error = E>
    + MatchStore<Error = E>
    + DirectoryStore<Error = E>
    + UserStore<Error = E>
    + Send
    + Sync
    + 'static,
  E: std::error::Error + Send + Sync + 'static,
{
  type StoreError = E;
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:   Arc<S>,
  pub scoring: ScoringOptions,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, scoring: ScoringOptions) -> Self {
    Self { store, scoring }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), scoring: self.scoring }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: AppStore,
{
  Router::new()
    // Matching — one route group per sweep direction.
    .nest(
      "/missing-person-with-ups",
      matching::routes::<S>(MatchDirection::MpToUp),
    )
    .nest(
      "/missing-person-with-ubs",
      matching::routes::<S>(MatchDirection::MpToUb),
    )
    .nest(
      "/unidentified-person-with-mps",
      matching::routes::<S>(MatchDirection::UpToMp),
    )
    .route(
      "/matches/{match_id}/mark-viewed",
      post(matching::mark_viewed_handler::<S>),
    )
    // Cases
    .route("/cases", get(cases::list::<S>).post(cases::create::<S>))
    .route(
      "/cases/{id}",
      get(cases::get_one::<S>)
        .put(cases::update::<S>)
        .delete(cases::remove::<S>),
    )
    .route("/cases/{id}/approve", post(cases::approve::<S>))
    .route("/cases/{id}/reject", post(cases::reject::<S>))
    .route("/cases/{id}/hold", post(cases::hold::<S>))
    .route(
      "/cases/{id}/additional-info",
      get(cases::get_additional_info::<S>)
        .put(cases::put_additional_info::<S>),
    )
    // Users
    .route("/users/register", post(users::register::<S>))
    .route("/users", get(users::list::<S>))
    .route("/users/me", get(users::me::<S>))
    .route("/users/{id}/approve", post(users::approve::<S>))
    .route("/users/{id}/reject", post(users::reject::<S>))
    // Directory
    .route(
      "/hospitals",
      get(directory::list_hospitals::<S>).post(directory::create_hospital::<S>),
    )
    .route(
      "/hospitals/{id}",
      get(directory::get_hospital::<S>)
        .delete(directory::delete_hospital::<S>),
    )
    .route(
      "/police-stations",
      get(directory::list_police_stations::<S>)
        .post(directory::create_police_station::<S>),
    )
    .route(
      "/police-stations/{id}",
      get(directory::get_police_station::<S>)
        .delete(directory::delete_police_station::<S>),
    )
    .route(
      "/volunteers",
      get(directory::list_volunteers::<S>)
        .post(directory::create_volunteer::<S>),
    )
    .route(
      "/volunteers/{id}",
      get(directory::get_volunteer::<S>)
        .delete(directory::delete_volunteer::<S>),
    )
    .route(
      "/documents",
      get(directory::list_documents::<S>)
        .post(directory::create_document::<S>),
    )
    .route(
      "/documents/{id}",
      get(directory::get_document::<S>)
        .delete(directory::delete_document::<S>),
    )
    .route(
      "/firs",
      get(directory::list_firs::<S>).post(directory::create_fir::<S>),
    )
    .route(
      "/firs/{id}",
      get(directory::get_fir::<S>).delete(directory::delete_fir::<S>),
    )
    .route(
      "/addresses",
      get(directory::list_addresses::<S>)
        .post(directory::create_address::<S>),
    )
    .route(
      "/addresses/{id}",
      get(directory::get_address::<S>)
        .delete(directory::delete_address::<S>),
    )
    .route(
      "/contacts",
      get(directory::list_contacts::<S>).post(directory::create_contact::<S>),
    )
    .route(
      "/contacts/{id}",
      get(directory::get_contact::<S>)
        .delete(directory::delete_contact::<S>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
