//! `GET /filters` — choices for a client's filter controls.

use std::sync::Arc;

use axum::{Json, extract::State};
use makan_core::{search::FilterOptions, store::DirectoryStore};

use crate::error::ApiError;

pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<FilterOptions>, ApiError>
where
  S: DirectoryStore,
{
  let restaurants = store.restaurants().await.map_err(ApiError::store)?;
  Ok(Json(FilterOptions::from_restaurants(&restaurants)))
}
