//! SQLite backend for the Makan restaurant directory.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Whole-table reads of restaurants and
//! reviews are served from an in-memory snapshot that every write to the
//! table invalidates.

mod cache;
mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
