//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  extract::rejection::StringRejection,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use makan_core::store::{ErrorKind, StoreError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("unknown table: {0:?}")]
  UnknownTable(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("malformed upload: {0}")]
  Csv(#[from] makan_csv::Error),
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
  #[error("{}", .0.body_text())]
  Rejected(#[from] StringRejection),
}

impl Error {
  /// Invalid and conflicting writes are the uploader's fault.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.kind() {
      ErrorKind::Invalid | ErrorKind::Conflict => Self::BadRequest(e.to_string()),
      ErrorKind::Internal => Self::Store(Box::new(e)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::UnknownTable(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) | Error::Csv(_) => StatusCode::BAD_REQUEST,
      Error::Rejected(r) => r.status(),
      Error::Io(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"makan\""),
      );
    }
    res
  }
}
