//! JSON REST API for Makan.
//!
//! Exposes an axum [`Router`] backed by any
//! [`makan_core::store::DirectoryStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", makan_api::api_router(store.clone()))
//! ```

pub mod assets;
pub mod error;
pub mod filters;
pub mod restaurants;
pub mod reviews;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use makan_core::{
  asset::{MAX_UPLOAD_BYTES, base64_body_limit},
  store::DirectoryStore,
};

pub use error::{ApiError, ApiJson};

/// Body limit for routes that carry a base64 file: one maximum-size upload
/// plus room for the other JSON fields.
pub const UPLOAD_BODY_LIMIT: usize = base64_body_limit(MAX_UPLOAD_BYTES, 64 * 1024);

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DirectoryStore + 'static,
{
  // Restaurant cards may embed an image as a data URL, so creation shares
  // the upload limit with menus and photos.
  let uploads = Router::new()
    .route(
      "/restaurants",
      get(restaurants::list::<S>).post(restaurants::create::<S>),
    )
    .route(
      "/restaurants/{name}/menus",
      get(assets::list_menus::<S>).post(assets::upload_menu::<S>),
    )
    .route(
      "/restaurants/{name}/gallery",
      get(assets::list_gallery::<S>).post(assets::upload_photo::<S>),
    )
    .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

  Router::new()
    .route("/restaurants/{name}", get(restaurants::get_one::<S>))
    .route("/restaurants/{name}/card", get(restaurants::card::<S>))
    // Reviews
    .route(
      "/restaurants/{name}/reviews",
      get(reviews::list::<S>).post(reviews::create::<S>),
    )
    // Filter controls
    .route("/filters", get(filters::handler::<S>))
    .merge(uploads)
    .with_state(store)
}

#[cfg(test)]
mod tests;
