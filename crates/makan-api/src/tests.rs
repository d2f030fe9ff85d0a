//! Router tests driving `api_router` over an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use makan_core::{
  asset::{MIME_PDF, NewAsset},
  restaurant::{NewRestaurant, PriceRange, PrivateRoom},
  store::DirectoryStore,
};
use makan_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

fn new_restaurant(
  name: &str,
  cuisine: &str,
  rating: f64,
  price_range: PriceRange,
  description: &str,
  room: Option<u32>,
) -> NewRestaurant {
  NewRestaurant {
    name: name.into(),
    cuisine: cuisine.into(),
    location: "Downtown".into(),
    rating,
    price_range,
    description: description.into(),
    address: format!("1 {name} Road"),
    image: None,
    private_room: if room.is_some() { PrivateRoom::Yes } else { PrivateRoom::No },
    max_capacity: room,
  }
}

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for input in [
    new_restaurant(
      "Les Amis",
      "French",
      4.8,
      PriceRange::Luxury,
      "Refined French fine dining.",
      Some(16),
    ),
    new_restaurant(
      "Odette",
      "French",
      5.0,
      PriceRange::Luxury,
      "Modern French cuisine.",
      Some(12),
    ),
    new_restaurant(
      "Jumbo Seafood",
      "Seafood",
      4.2,
      PriceRange::Expensive,
      "Famous for Chili Crab by the river.",
      None,
    ),
  ] {
    store.add_restaurant(input).await.unwrap();
  }
  api_router(Arc::new(store))
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

fn names(v: &Value) -> Vec<&str> {
  v.as_array()
    .unwrap()
    .iter()
    .map(|r| r["name"].as_str().unwrap())
    .collect()
}

// ── Search ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_without_filters_returns_table_order() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/restaurants", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), ["Les Amis", "Odette", "Jumbo Seafood"]);
}

#[tokio::test]
async fn all_means_no_constraint() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "GET",
    "/restaurants?cuisine=French&location=All&price_range=All&private_room=All",
    None,
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), ["Les Amis", "Odette"]);
}

#[tokio::test]
async fn quoted_phrase_search() {
  let app = app().await;
  let (_, body) =
    send(&app, "GET", "/restaurants?q=%22chili%20crab%22", None).await;
  assert_eq!(names(&body), ["Jumbo Seafood"]);
}

#[tokio::test]
async fn private_room_capacity_filter() {
  let app = app().await;
  let (_, body) = send(
    &app,
    "GET",
    "/restaurants?private_room=Yes&min_capacity=15",
    None,
  )
  .await;
  assert_eq!(names(&body), ["Les Amis"]);

  let (_, body) = send(&app, "GET", "/restaurants?private_room=Yes", None).await;
  assert_eq!(names(&body), ["Les Amis", "Odette"]);
}

#[tokio::test]
async fn min_rating_five_keeps_perfect_scores() {
  let app = app().await;
  let (_, body) = send(&app, "GET", "/restaurants?min_rating=5.0", None).await;
  assert_eq!(names(&body), ["Odette"]);
}

#[tokio::test]
async fn unknown_price_range_is_bad_request() {
  let app = app().await;
  let (status, body) =
    send(&app, "GET", "/restaurants?price_range=cheap", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("cheap"));
}

// ── Create / get ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get() {
  let app = app().await;
  let body = json!({
    "name": "Burnt Ends",
    "cuisine": "Barbecue",
    "location": "Dempsey",
    "rating": 4.6,
    "price_range": "$$$",
    "description": "Wood-fired Australian barbecue.",
    "address": "7 Dempsey Rd",
  });
  let (status, created) = send(&app, "POST", "/restaurants", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["private_room"], "No");
  assert!(created["image"].as_str().unwrap().starts_with("https://placehold.co"));

  let (status, fetched) = send(&app, "GET", "/restaurants/Burnt%20Ends", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["price_range"], "$$$");
}

#[tokio::test]
async fn duplicate_create_is_conflict() {
  let app = app().await;
  let body = json!({
    "name": "Odette",
    "cuisine": "Italian",
    "location": "Elsewhere",
    "rating": 3.0,
    "price_range": "$",
    "description": "Impostor.",
    "address": "2 Fake St",
  });
  let (status, _) = send(&app, "POST", "/restaurants", Some(body)).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (_, fetched) = send(&app, "GET", "/restaurants/Odette", None).await;
  assert_eq!(fetched["cuisine"], "French");
}

#[tokio::test]
async fn blank_field_is_bad_request() {
  let app = app().await;
  let body = json!({
    "name": "Nameless",
    "cuisine": " ",
    "location": "Somewhere",
    "rating": 3.0,
    "price_range": "$",
    "description": "d",
    "address": "a",
  });
  let (status, body) = send(&app, "POST", "/restaurants", Some(body)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("cuisine"));
}

#[tokio::test]
async fn missing_restaurant_is_404() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/restaurants/Nowhere", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("Nowhere"));
}

#[tokio::test]
async fn card_formats_rating_and_room() {
  let app = app().await;
  let (status, card) = send(&app, "GET", "/restaurants/Les%20Amis/card", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(card["rating"], "4.8");
  assert_eq!(card["price"], "$$$$");
  assert_eq!(card["private_room"], "Yes (Max Capacity: 16)");
}

// ── Reviews ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn posted_review_is_listed_first() {
  let app = app().await;
  for text in ["First visit.", "Second visit."] {
    let (status, _) = send(
      &app,
      "POST",
      "/restaurants/Odette/reviews",
      Some(json!({
        "rating": 4.5,
        "review_text": text,
        "reviewer_name": "Mei",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
  }

  let (status, reviews) = send(&app, "GET", "/restaurants/Odette/reviews", None).await;
  assert_eq!(status, StatusCode::OK);
  let reviews = reviews.as_array().unwrap();
  assert_eq!(reviews.len(), 2);
  assert_eq!(reviews[0]["review_text"], "Second visit.");
  assert_eq!(reviews[0]["restaurant_name"], "Odette");
}

#[tokio::test]
async fn review_of_unknown_restaurant_is_404() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/restaurants/Nowhere/reviews",
    Some(json!({ "rating": 4.0, "review_text": "?", "reviewer_name": "X" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_text_search_finds_restaurant() {
  let app = app().await;
  send(
    &app,
    "POST",
    "/restaurants/Les%20Amis/reviews",
    Some(json!({
      "rating": 5.0,
      "review_text": "The souffle was sublime.",
      "reviewer_name": "Arjun",
    })),
  )
  .await;
  let (_, body) = send(&app, "GET", "/restaurants?q=souffle", None).await;
  assert_eq!(names(&body), ["Les Amis"]);
}

// ── Assets ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn menu_upload_accepts_pdf() {
  let app = app().await;
  let (status, asset) = send(
    &app,
    "POST",
    "/restaurants/Odette/menus",
    Some(json!({
      "file_name": "dinner.pdf",
      "file_type": "application/pdf",
      "base64_data": "JVBERi0xLjQ=",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(asset["kind"], "menu");

  let (_, menus) = send(&app, "GET", "/restaurants/Odette/menus", None).await;
  assert_eq!(menus.as_array().unwrap().len(), 1);
  let (_, gallery) = send(&app, "GET", "/restaurants/Odette/gallery", None).await;
  assert!(gallery.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn large_menu_fits_under_upload_limit() {
  let app = app().await;
  let pdf = NewAsset::from_bytes("Odette", "tasting.pdf", MIME_PDF, &vec![b'%'; 3 * 1024 * 1024]);
  let (status, asset) = send(
    &app,
    "POST",
    "/restaurants/Odette/menus",
    Some(json!({
      "file_name": pdf.file_name,
      "file_type": pdf.file_type,
      "base64_data": pdf.base64_data,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(asset["base64_data"].as_str().unwrap().len(), 4 * 1024 * 1024);
}

#[tokio::test]
async fn oversized_review_is_rejected_as_json() {
  let app = app().await;
  let (status, body) = send(
    &app,
    "POST",
    "/restaurants/Odette/reviews",
    Some(json!({
      "rating": 4.0,
      "review_text": "a".repeat(3 * 1024 * 1024),
      "reviewer_name": "Siti",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
  assert!(body["error"].as_str().unwrap().contains("length limit"));
}

#[tokio::test]
async fn malformed_json_body_is_rejected_as_json() {
  let app = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/restaurants/Odette/reviews")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"rating\": "))
    .unwrap();
  let resp = app.oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn gallery_rejects_pdf() {
  let app = app().await;
  let (status, _) = send(
    &app,
    "POST",
    "/restaurants/Odette/gallery",
    Some(json!({
      "file_name": "dinner.pdf",
      "file_type": "application/pdf",
      "base64_data": "JVBERi0xLjQ=",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Filters ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_options_reflect_table() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/filters", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["cuisines"], json!(["French", "Seafood"]));
  assert_eq!(body["locations"], json!(["Downtown"]));
  assert_eq!(body["price_ranges"], json!(["$", "$$", "$$$", "$$$$"]));
  assert_eq!(body["max_private_room_capacity"], 16);
}
