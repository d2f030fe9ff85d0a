//! Error type for `makan-store-sqlite`.

use makan_core::store::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The input failed domain validation.
  #[error("invalid input: {0}")]
  Invalid(#[from] makan_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column held a value the domain types do not accept.
  #[error("corrupt {column} value: {value:?}")]
  Corrupt { column: &'static str, value: String },

  #[error("restaurant {0:?} already exists")]
  DuplicateRestaurant(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl makan_core::store::StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::Invalid(_) => ErrorKind::Invalid,
      Self::DuplicateRestaurant(_) => ErrorKind::Conflict,
      Self::Database(_)
      | Self::Uuid(_)
      | Self::DateParse(_)
      | Self::Corrupt { .. } => ErrorKind::Internal,
    }
  }
}
