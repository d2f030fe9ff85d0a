//! `GET /export/{table}` — download a table as CSV.

use axum::{
  body::Body,
  extract::{Path, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::Response,
};
use makan_core::{
  asset::AssetKind,
  store::{DirectoryStore, TableKind},
};

use crate::{
  AppState,
  error::{Error, Result},
  etag::compute_etag,
};

pub const CONTENT_TYPE_CSV: &str = "text/csv; charset=utf-8";

/// Render `table` from `store` as CSV.
pub async fn render<S>(store: &S, table: TableKind) -> Result<String>
where
  S: DirectoryStore,
{
  let csv = match table {
    TableKind::Restaurants => {
      makan_csv::serialize_restaurants(&store.restaurants().await.map_err(Error::store)?)
    }
    TableKind::Reviews => {
      makan_csv::serialize_reviews(&store.reviews().await.map_err(Error::store)?)
    }
    TableKind::Menus => makan_csv::serialize_assets(
      &store.assets(AssetKind::Menu).await.map_err(Error::store)?,
    ),
    TableKind::Gallery => makan_csv::serialize_assets(
      &store.assets(AssetKind::Gallery).await.map_err(Error::store)?,
    ),
  };
  Ok(csv)
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Path(table): Path<String>,
  headers: HeaderMap,
) -> Result<Response>
where
  S: DirectoryStore + 'static,
{
  let kind: TableKind = table.parse().map_err(|_| Error::UnknownTable(table.clone()))?;
  let csv = render(state.store.as_ref(), kind).await?;
  let etag = compute_etag(csv.as_bytes());

  let unchanged = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v == etag);

  let disposition = format!("attachment; filename=\"{}\"", kind.export_file_name());
  let builder = Response::builder()
    .header(header::ETAG, &etag)
    .header(header::CONTENT_DISPOSITION, disposition);

  let response = if unchanged {
    builder.status(StatusCode::NOT_MODIFIED).body(Body::empty())
  } else {
    builder
      .status(StatusCode::OK)
      .header(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_CSV))
      .body(Body::from(csv))
  };
  response.map_err(|e| Error::Store(Box::new(e)))
}
