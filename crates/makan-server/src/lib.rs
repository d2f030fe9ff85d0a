//! HTTP server for the Makan restaurant directory.
//!
//! Serves the JSON API from [`makan_api`] under `/api`, CSV downloads of every
//! table under `/export`, and an authenticated admin upload that replaces the
//! restaurant table.

pub mod auth;
pub mod error;
pub mod etag;
pub mod handlers;

pub use error::{Error, Result};

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, put},
};
use makan_core::{asset::MAX_UPLOAD_BYTES, store::DirectoryStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use auth::AuthConfig;
use handlers::{admin, export};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MAKAN_`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  pub admin_password_hash: String,
  /// Restaurant CSV imported when the table is empty at startup.
  #[serde(default)]
  pub seed_restaurants:    Option<PathBuf>,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the server's own handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      auth:  Arc::clone(&self.auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DirectoryStore + 'static,
{
  Router::new()
    .route("/export/{table}", get(export::handler::<S>))
    .route(
      "/admin/restaurants",
      put(admin::replace_restaurants::<S>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
    .with_state(state.clone())
    .nest("/api", makan_api::api_router(state.store))
    .layer(TraceLayer::new_for_http())
}

// ─── Seeding ──────────────────────────────────────────────────────────────────

/// Import the restaurant CSV at `path` if the restaurant table is empty.
///
/// A missing file is treated as an empty table. Returns the number of
/// restaurants imported.
pub async fn seed_restaurants<S>(store: &S, path: &Path) -> Result<usize>
where
  S: DirectoryStore,
{
  if !store.restaurants().await.map_err(Error::store)?.is_empty() {
    return Ok(0);
  }

  let text = match tokio::fs::read_to_string(path).await {
    Ok(text) => text,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      warn!(path = %path.display(), "seed file not found; starting with no restaurants");
      return Ok(0);
    }
    Err(e) => return Err(e.into()),
  };

  let restaurants = makan_csv::parse_restaurants(&text)?;
  let count = store
    .replace_restaurants(restaurants)
    .await
    .map_err(Error::store)?;
  info!(count, path = %path.display(), "seeded restaurant table");
  Ok(count)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use makan_core::{
    asset::{AssetKind, NewAsset},
    restaurant::{NewRestaurant, PriceRange, PrivateRoom},
    review::NewReview,
  };
  use makan_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use tower::ServiceExt as _;

  pub(crate) fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  pub(crate) fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn odette() -> NewRestaurant {
    NewRestaurant {
      name:         "Odette".into(),
      cuisine:      "French".into(),
      location:     "City Hall".into(),
      rating:       5.0,
      price_range:  PriceRange::Luxury,
      description:  "Modern French, at the National Gallery.".into(),
      address:      "1 St Andrew's Rd".into(),
      image:        Some("https://example.com/odette.jpg".into()),
      private_room: PrivateRoom::Yes,
      max_capacity: Some(12),
    }
  }

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store.add_restaurant(odette()).await.unwrap();
    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash("secret"),
      }),
    }
  }

  async fn oneshot_raw(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
    body: &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_text(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  // ── API mount ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn api_is_nested() {
    let state = make_state().await;
    let resp = oneshot_raw(state, "GET", "/api/restaurants/Odette", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("\"City Hall\""));
  }

  // ── Export ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn export_restaurants_as_csv() {
    let state = make_state().await;
    let resp = oneshot_raw(state, "GET", "/export/restaurants", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
      headers[header::CONTENT_DISPOSITION],
      "attachment; filename=\"restaurants_database.csv\""
    );

    let csv = body_text(resp).await;
    assert!(csv.starts_with("Name,Cuisine,Location,Rating,Price Range"));
    assert!(csv.contains("Odette,French,City Hall,5.0,$$$$"));
    assert!(csv.trim_end().ends_with(",Yes,12"));
    assert_eq!(
      headers[header::ETAG].to_str().unwrap(),
      etag::compute_etag(csv.as_bytes())
    );
  }

  #[tokio::test]
  async fn export_reviews_and_assets() {
    let state = make_state().await;
    state
      .store
      .add_review(NewReview {
        restaurant_name:      "Odette".into(),
        rating:               4.0,
        review_text:          "Beautiful room.".into(),
        reviewer_name:        "Siti".into(),
        reviewer_department:  String::new(),
        reviewer_designation: String::new(),
      })
      .await
      .unwrap();
    state
      .store
      .add_asset(
        AssetKind::Gallery,
        NewAsset::from_bytes("Odette", "room.png", "image/png", b"\x89PNG"),
      )
      .await
      .unwrap();

    let resp = oneshot_raw(state.clone(), "GET", "/export/reviews", vec![], "").await;
    assert_eq!(
      resp.headers()[header::CONTENT_DISPOSITION],
      "attachment; filename=\"restaurant_reviews.csv\""
    );
    assert!(body_text(resp).await.contains("Odette,4.0,Beautiful room.,Siti,,,"));

    let resp = oneshot_raw(state.clone(), "GET", "/export/gallery", vec![], "").await;
    assert!(body_text(resp).await.contains("Odette,room.png,image/png,iVBORw==,"));

    let resp = oneshot_raw(state, "GET", "/export/menus", vec![], "").await;
    assert_eq!(
      body_text(resp).await,
      "restaurant_name,file_name,file_type,base64_data,timestamp\n"
    );
  }

  #[tokio::test]
  async fn matching_etag_is_not_modified() {
    let state = make_state().await;
    let first = oneshot_raw(state.clone(), "GET", "/export/restaurants", vec![], "").await;
    let etag = first.headers()[header::ETAG].to_str().unwrap().to_string();

    let again = oneshot_raw(
      state,
      "GET",
      "/export/restaurants",
      vec![(header::IF_NONE_MATCH, etag.as_str())],
      "",
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_MODIFIED);
  }

  #[tokio::test]
  async fn unknown_table_is_404() {
    let state = make_state().await;
    let resp = oneshot_raw(state, "GET", "/export/photos", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Admin upload ────────────────────────────────────────────────────────────

  const UPLOAD: &str = "Name,Cuisine,Location,Rating,Price Range,Description,Image,Address\n\
                        Candlenut,Peranakan,Dempsey,4.4,$$$,\"Buah keluak, done right.\",,17 Dempsey Rd\n\
                        Burnt Ends,Barbecue,Dempsey,4.6,$$$,Wood-fired.,,7 Dempsey Rd\n";

  #[tokio::test]
  async fn upload_requires_credentials() {
    let state = make_state().await;
    let resp = oneshot_raw(state.clone(), "PUT", "/admin/restaurants", vec![], UPLOAD).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let wrong = basic("admin", "nope");
    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      "/admin/restaurants",
      vec![(header::AUTHORIZATION, wrong.as_str())],
      UPLOAD,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Table untouched.
    assert_eq!(state.store.restaurants().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn upload_replaces_table_with_back_fill() {
    let state = make_state().await;
    let auth = basic("admin", "secret");
    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      "/admin/restaurants",
      vec![(header::AUTHORIZATION, auth.as_str())],
      UPLOAD,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "{\"replaced\":2}");

    let restaurants = state.store.restaurants().await.unwrap();
    let names: Vec<_> = restaurants.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Candlenut", "Burnt Ends"]);
    assert_eq!(restaurants[0].description, "Buah keluak, done right.");
    assert!(restaurants.iter().all(|r| r.private_room == PrivateRoom::No));
  }

  #[tokio::test]
  async fn malformed_upload_is_rejected() {
    let state = make_state().await;
    let auth = basic("admin", "secret");
    let bad = "Name,Cuisine,Location,Rating,Price Range,Description,Image,Address\n\
               Candlenut,Peranakan,Dempsey,great,$$$,d,,addr\n";
    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      "/admin/restaurants",
      vec![(header::AUTHORIZATION, auth.as_str())],
      bad,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("line 2"));

    let names: Vec<_> = state
      .store
      .restaurants()
      .await
      .unwrap()
      .into_iter()
      .map(|r| r.name)
      .collect();
    assert_eq!(names, ["Odette"]);
  }

  #[tokio::test]
  async fn large_upload_with_embedded_image_is_accepted() {
    let state = make_state().await;
    let auth = basic("admin", "secret");
    let image = format!("data:image/png;base64,{}", "A".repeat(3 * 1024 * 1024));
    let csv = format!(
      "Name,Cuisine,Location,Rating,Price Range,Description,Image,Address\n\
       Candlenut,Peranakan,Dempsey,4.4,$$$,Buah keluak.,{image},17 Dempsey Rd\n"
    );
    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      "/admin/restaurants",
      vec![(header::AUTHORIZATION, auth.as_str())],
      &csv,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "{\"replaced\":1}");

    let restaurants = state.store.restaurants().await.unwrap();
    assert_eq!(restaurants[0].image, image);
  }

  #[tokio::test]
  async fn non_utf8_upload_is_rejected_as_json() {
    let state = make_state().await;
    let auth = basic("admin", "secret");
    let req = Request::builder()
      .method("PUT")
      .uri("/admin/restaurants")
      .header(header::AUTHORIZATION, auth.as_str())
      .body(Body::from(vec![0xff, 0xfe, 0xfd]))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.starts_with("{\"error\":"));
  }

  #[tokio::test]
  async fn upload_with_repeated_name_is_rejected() {
    let state = make_state().await;
    let auth = basic("admin", "secret");
    let twice = format!("{UPLOAD}Candlenut,Peranakan,Dempsey,4.0,$$,d,,addr\n");
    let resp = oneshot_raw(
      state.clone(),
      "PUT",
      "/admin/restaurants",
      vec![(header::AUTHORIZATION, auth.as_str())],
      &twice,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.store.restaurants().await.unwrap().len(), 1);
  }

  // ── Seeding ─────────────────────────────────────────────────────────────────

  fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("makan-{}-{name}", std::process::id()))
  }

  #[tokio::test]
  async fn missing_seed_file_means_empty_table() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let seeded = seed_restaurants(&store, &temp_path("absent.csv")).await.unwrap();
    assert_eq!(seeded, 0);
    assert!(store.restaurants().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn seed_fills_empty_table_only() {
    let path = temp_path("seed.csv");
    tokio::fs::write(&path, UPLOAD).await.unwrap();

    let empty = SqliteStore::open_in_memory().await.unwrap();
    assert_eq!(seed_restaurants(&empty, &path).await.unwrap(), 2);

    let populated = SqliteStore::open_in_memory().await.unwrap();
    populated.add_restaurant(odette()).await.unwrap();
    assert_eq!(seed_restaurants(&populated, &path).await.unwrap(), 0);
    assert_eq!(populated.restaurants().await.unwrap().len(), 1);

    tokio::fs::remove_file(&path).await.unwrap();
  }
}
