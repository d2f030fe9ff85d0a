//! Error types for `makan-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("{field} must be between 0.0 and 5.0, got {value}")]
  RatingOutOfRange { field: &'static str, value: f64 },

  #[error("private room capacity must be at least 1")]
  InvalidCapacity,

  #[error("unknown price range: {0:?}")]
  UnknownPriceRange(String),

  #[error("unknown private room value: {0:?}")]
  UnknownPrivateRoom(String),

  #[error("unsupported file type {file_type:?} for {kind}")]
  UnsupportedFileType { kind: &'static str, file_type: String },

  #[error("payload is not valid base64: {0}")]
  InvalidPayload(#[from] base64::DecodeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
