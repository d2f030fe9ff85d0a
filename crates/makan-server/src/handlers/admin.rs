//! `PUT /admin/restaurants` — replace the restaurant table from a CSV upload.

use axum::{
  Json,
  extract::{State, rejection::StringRejection},
};
use makan_core::store::DirectoryStore;
use serde::Serialize;
use tracing::info;

use crate::{AppState, auth::Admin, error::{Error, Result}};

#[derive(Debug, Serialize)]
pub struct Replaced {
  pub replaced: usize,
}

/// Body is a restaurant CSV. Absent `Private Room` / `Max Capacity` columns
/// are back-filled; any malformed row rejects the whole upload.
pub async fn replace_restaurants<S>(
  State(state): State<AppState<S>>,
  _admin: Admin,
  body: std::result::Result<String, StringRejection>,
) -> Result<Json<Replaced>>
where
  S: DirectoryStore + 'static,
{
  let body = body?;
  let restaurants = makan_csv::parse_restaurants(&body)?;
  let replaced = state
    .store
    .replace_restaurants(restaurants)
    .await
    .map_err(Error::store)?;
  info!(replaced, "restaurant table replaced by admin upload");
  Ok(Json(Replaced { replaced }))
}
