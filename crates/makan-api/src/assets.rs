//! Handlers for menu and gallery uploads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/restaurants/{name}/menus` | Upload order |
//! | `POST` | `/restaurants/{name}/menus` | Body: [`AssetBody`]; PDF, PNG or JPEG |
//! | `GET`  | `/restaurants/{name}/gallery` | Upload order |
//! | `POST` | `/restaurants/{name}/gallery` | Body: [`AssetBody`]; PNG or JPEG |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use makan_core::{
  asset::{Asset, AssetKind, NewAsset},
  store::DirectoryStore,
};
use serde::Deserialize;

use crate::{
  error::{ApiError, ApiJson},
  restaurants::find,
};

/// JSON body accepted by the upload endpoints.
#[derive(Debug, Deserialize)]
pub struct AssetBody {
  pub file_name:   String,
  /// MIME type, e.g. `application/pdf`.
  pub file_type:   String,
  /// Standard base64 of the file contents.
  pub base64_data: String,
}

async fn list<S>(store: &S, kind: AssetKind, name: &str) -> Result<Vec<Asset>, ApiError>
where
  S: DirectoryStore,
{
  find(store, name).await?;
  store.assets_for(kind, name).await.map_err(ApiError::store)
}

async fn upload<S>(
  store: &S,
  kind: AssetKind,
  name: &str,
  body: AssetBody,
) -> Result<Response, ApiError>
where
  S: DirectoryStore,
{
  let restaurant = find(store, name).await?;
  let asset = store
    .add_asset(kind, NewAsset {
      restaurant_name: restaurant.name,
      file_name:       body.file_name,
      file_type:       body.file_type,
      base64_data:     body.base64_data,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(asset)).into_response())
}

/// `GET /restaurants/{name}/menus`
pub async fn list_menus<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<Asset>>, ApiError>
where
  S: DirectoryStore,
{
  Ok(Json(list(store.as_ref(), AssetKind::Menu, &name).await?))
}

/// `POST /restaurants/{name}/menus`
pub async fn upload_menu<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
  ApiJson(body): ApiJson<AssetBody>,
) -> Result<Response, ApiError>
where
  S: DirectoryStore,
{
  upload(store.as_ref(), AssetKind::Menu, &name, body).await
}

/// `GET /restaurants/{name}/gallery`
pub async fn list_gallery<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<Asset>>, ApiError>
where
  S: DirectoryStore,
{
  Ok(Json(list(store.as_ref(), AssetKind::Gallery, &name).await?))
}

/// `POST /restaurants/{name}/gallery`
pub async fn upload_photo<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
  ApiJson(body): ApiJson<AssetBody>,
) -> Result<Response, ApiError>
where
  S: DirectoryStore,
{
  upload(store.as_ref(), AssetKind::Gallery, &name, body).await
}
