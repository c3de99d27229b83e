//! SQLite backend for the Reunite case store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Multi-row lifecycle writes
//! (case-id allocation, confirm/unconfirm) run inside transactions on the
//! single serialized connection.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
