//! Handlers for `/restaurants/{name}/reviews`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use makan_core::{
  review::{NewReview, Review},
  store::DirectoryStore,
};
use serde::Deserialize;

use crate::{
  error::{ApiError, ApiJson},
  restaurants::find,
};

/// `GET /restaurants/{name}/reviews` — newest first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError>
where
  S: DirectoryStore,
{
  find(store.as_ref(), &name).await?;
  let reviews = store.reviews_for(&name).await.map_err(ApiError::store)?;
  Ok(Json(reviews))
}

/// JSON body accepted by `POST /restaurants/{name}/reviews`.
#[derive(Debug, Deserialize)]
pub struct ReviewBody {
  pub rating:               f64,
  pub review_text:          String,
  pub reviewer_name:        String,
  #[serde(default)]
  pub reviewer_department:  String,
  #[serde(default)]
  pub reviewer_designation: String,
}

/// `POST /restaurants/{name}/reviews` — returns 201 + the stored [`Review`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Path(name): Path<String>,
  ApiJson(body): ApiJson<ReviewBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let restaurant = find(store.as_ref(), &name).await?;
  let review = store
    .add_review(NewReview {
      restaurant_name:      restaurant.name,
      rating:               body.rating,
      review_text:          body.review_text,
      reviewer_name:        body.reviewer_name,
      reviewer_department:  body.reviewer_department,
      reviewer_designation: body.reviewer_designation,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(review)))
}
