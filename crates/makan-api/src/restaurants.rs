//! Handlers for `/restaurants` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/restaurants` | Query: [`SearchParams`]; table order |
//! | `POST` | `/restaurants` | Body: [`NewRestaurant`]; 201, or 409 if the name is taken |
//! | `GET`  | `/restaurants/{name}` | Single restaurant |
//! | `GET`  | `/restaurants/{name}/card` | [`RestaurantCard`] text fields |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use makan_core::{
  card::RestaurantCard,
  restaurant::{NewRestaurant, PriceRange, PrivateRoom, Restaurant},
  search::RestaurantQuery,
  store::DirectoryStore,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiJson};

// ─── Search ──────────────────────────────────────────────────────────────────

/// Query string accepted by `GET /restaurants`.
///
/// Categorical filters take the literal `All` (or nothing) to mean no
/// constraint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  /// Free-text query; see [`makan_core::search`] for the syntax.
  pub q:            Option<String>,
  pub cuisine:      Option<String>,
  pub location:     Option<String>,
  /// `$` through `$$$$`.
  pub price_range:  Option<String>,
  pub min_rating:   Option<f64>,
  /// `Yes` or `No`.
  pub private_room: Option<String>,
  pub min_capacity: Option<u32>,
}

/// `None` for absent, blank, or `All`.
fn constraint(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty() && v != "All")
}

impl TryFrom<SearchParams> for RestaurantQuery {
  type Error = ApiError;

  fn try_from(p: SearchParams) -> Result<Self, ApiError> {
    let price_range = constraint(p.price_range)
      .map(|s| PriceRange::parse(&s))
      .transpose()
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let private_room = constraint(p.private_room)
      .map(|s| PrivateRoom::parse(&s))
      .transpose()
      .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(RestaurantQuery {
      text: p.q.filter(|q| !q.trim().is_empty()),
      cuisine: constraint(p.cuisine),
      location: constraint(p.location),
      price_range,
      min_rating: p.min_rating.unwrap_or(0.0),
      private_room,
      min_capacity: p.min_capacity,
    })
  }
}

/// `GET /restaurants[?q=...][&cuisine=...][&price_range=...]...`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Restaurant>>, ApiError>
where
  S: DirectoryStore,
{
  let query = RestaurantQuery::try_from(params)?;
  let found = store.search(&query).await.map_err(ApiError::store)?;
  Ok(Json(found))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /restaurants` — returns 201 + the stored [`Restaurant`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<NewRestaurant>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let restaurant = store.add_restaurant(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(restaurant)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

pub(crate) async fn find<S>(store: &S, name: &str) -> Result<Restaurant, ApiError>
where
  S: DirectoryStore,
{
  store
    .get_restaurant(name)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::restaurant_not_found(name))
}

/// `GET /restaurants/{name}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<Restaurant>, ApiError>
where
  S: DirectoryStore,
{
  Ok(Json(find(store.as_ref(), &name).await?))
}

/// `GET /restaurants/{name}/card`
pub async fn card<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<RestaurantCard>, ApiError>
where
  S: DirectoryStore,
{
  let restaurant = find(store.as_ref(), &name).await?;
  Ok(Json(RestaurantCard::new(&restaurant)))
}
