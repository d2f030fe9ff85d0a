//! Integration tests for `SqliteStore` against an in-memory database.

use makan_core::{
  asset::{AssetKind, NewAsset},
  restaurant::{DEFAULT_PRIVATE_ROOM_CAPACITY, NewRestaurant, PriceRange, PrivateRoom},
  review::NewReview,
  search::RestaurantQuery,
  store::DirectoryStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn restaurant(name: &str, cuisine: &str, rating: f64) -> NewRestaurant {
  NewRestaurant {
    name:         name.into(),
    cuisine:      cuisine.into(),
    location:     "Tanjong Pagar".into(),
    rating,
    price_range:  PriceRange::Moderate,
    description:  format!("{cuisine} food."),
    address:      format!("1 {name} Street"),
    image:        None,
    private_room: PrivateRoom::No,
    max_capacity: None,
  }
}

fn review(name: &str, text: &str, rating: f64) -> NewReview {
  NewReview {
    restaurant_name:      name.into(),
    rating,
    review_text:          text.into(),
    reviewer_name:        "Wei Ling".into(),
    reviewer_department:  "Operations".into(),
    reviewer_designation: String::new(),
  }
}

// ─── Restaurants ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_restaurant() {
  let s = store().await;

  let mut input = restaurant("Candlenut", "Peranakan", 4.4);
  input.private_room = PrivateRoom::Yes;
  let added = s.add_restaurant(input).await.unwrap();
  assert_eq!(added.max_capacity, Some(DEFAULT_PRIVATE_ROOM_CAPACITY));

  let fetched = s.get_restaurant("Candlenut").await.unwrap().unwrap();
  assert_eq!(fetched, added);
  assert!(s.get_restaurant("Nowhere").await.unwrap().is_none());
}

#[tokio::test]
async fn restaurants_keep_insertion_order() {
  let s = store().await;
  for name in ["Zeta", "Alpha", "Mu"] {
    s.add_restaurant(restaurant(name, "Fusion", 4.0)).await.unwrap();
  }
  let names: Vec<_> = s
    .restaurants()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, ["Zeta", "Alpha", "Mu"]);
}

#[tokio::test]
async fn duplicate_name_is_rejected_and_table_unchanged() {
  let s = store().await;
  s.add_restaurant(restaurant("Candlenut", "Peranakan", 4.4))
    .await
    .unwrap();
  // Prime the cache so the rejection has to leave it valid.
  let before = s.restaurants().await.unwrap();

  let err = s
    .add_restaurant(restaurant("Candlenut", "Italian", 1.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateRestaurant(name) if name == "Candlenut"));

  assert_eq!(s.restaurants().await.unwrap(), before);
  let stored = s.get_restaurant("Candlenut").await.unwrap().unwrap();
  assert_eq!(stored.cuisine, "Peranakan");
}

#[tokio::test]
async fn invalid_restaurant_is_rejected() {
  let s = store().await;
  let err = s
    .add_restaurant(restaurant("Bad", "Fusion", 9.0))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Invalid(_)));
  assert!(s.restaurants().await.unwrap().is_empty());
}

#[tokio::test]
async fn add_invalidates_cached_restaurants() {
  let s = store().await;
  assert!(s.restaurants().await.unwrap().is_empty());
  s.add_restaurant(restaurant("Candlenut", "Peranakan", 4.4))
    .await
    .unwrap();
  assert_eq!(s.restaurants().await.unwrap().len(), 1);
}

#[tokio::test]
async fn replace_swaps_whole_table() {
  let s = store().await;
  s.add_restaurant(restaurant("Old", "Fusion", 3.0)).await.unwrap();
  assert_eq!(s.restaurants().await.unwrap().len(), 1);

  let fresh = vec![
    restaurant("New A", "Thai", 4.0).validate().unwrap(),
    restaurant("New B", "Korean", 4.5).validate().unwrap(),
  ];
  assert_eq!(s.replace_restaurants(fresh.clone()).await.unwrap(), 2);
  assert_eq!(s.restaurants().await.unwrap(), fresh);
  assert!(s.get_restaurant("Old").await.unwrap().is_none());
}

#[tokio::test]
async fn replace_with_repeated_name_changes_nothing() {
  let s = store().await;
  s.add_restaurant(restaurant("Old", "Fusion", 3.0)).await.unwrap();

  let upload = vec![
    restaurant("Twin", "Thai", 4.0).validate().unwrap(),
    restaurant("Twin", "Thai", 4.1).validate().unwrap(),
  ];
  let err = s.replace_restaurants(upload).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateRestaurant(name) if name == "Twin"));

  let names: Vec<_> = s
    .restaurants()
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, ["Old"]);
}

// ─── Reviews ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_review_comes_first() {
  let s = store().await;
  s.add_review(review("Candlenut", "Great buah keluak.", 4.5))
    .await
    .unwrap();
  s.add_review(review("Other", "Elsewhere.", 3.0)).await.unwrap();
  let latest = s
    .add_review(review("Candlenut", "Even better second time.", 5.0))
    .await
    .unwrap();

  let reviews = s.reviews_for("Candlenut").await.unwrap();
  assert_eq!(reviews.len(), 2);
  assert_eq!(reviews[0].review_id, latest.review_id);
  assert_eq!(reviews[0].review_text, "Even better second time.");
  assert!(reviews.iter().all(|r| r.restaurant_name == "Candlenut"));
}

#[tokio::test]
async fn add_invalidates_cached_reviews() {
  let s = store().await;
  assert!(s.reviews().await.unwrap().is_empty());
  s.add_review(review("Candlenut", "Good.", 4.0)).await.unwrap();
  s.add_review(review("Candlenut", "Better.", 4.5)).await.unwrap();

  let all = s.reviews().await.unwrap();
  assert_eq!(all.len(), 2);
  // Whole-table loads stay in insertion order.
  assert_eq!(all[0].review_text, "Good.");
}

#[tokio::test]
async fn review_requires_reviewer() {
  let s = store().await;
  let mut bad = review("Candlenut", "Nice.", 4.0);
  bad.reviewer_name = " ".into();
  assert!(matches!(s.add_review(bad).await, Err(Error::Invalid(_))));
}

// ─── Assets ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn assets_are_split_by_kind_and_restaurant() {
  let s = store().await;
  s.add_asset(
    AssetKind::Menu,
    NewAsset::from_bytes("Candlenut", "lunch.pdf", "application/pdf", b"%PDF-1.4"),
  )
  .await
  .unwrap();
  s.add_asset(
    AssetKind::Gallery,
    NewAsset::from_bytes("Candlenut", "room.png", "image/png", b"\x89PNG"),
  )
  .await
  .unwrap();
  s.add_asset(
    AssetKind::Gallery,
    NewAsset::from_bytes("Odette", "plate.jpg", "image/jpeg", b"\xff\xd8"),
  )
  .await
  .unwrap();

  let menus = s.assets_for(AssetKind::Menu, "Candlenut").await.unwrap();
  assert_eq!(menus.len(), 1);
  assert_eq!(menus[0].file_name, "lunch.pdf");
  assert_eq!(menus[0].kind, AssetKind::Menu);

  let gallery = s.assets(AssetKind::Gallery).await.unwrap();
  let files: Vec<_> = gallery.iter().map(|a| a.file_name.as_str()).collect();
  assert_eq!(files, ["room.png", "plate.jpg"]);

  assert!(s.assets_for(AssetKind::Menu, "Odette").await.unwrap().is_empty());
}

#[tokio::test]
async fn gallery_rejects_pdf() {
  let s = store().await;
  let err = s
    .add_asset(
      AssetKind::Gallery,
      NewAsset::from_bytes("Candlenut", "menu.pdf", "application/pdf", b"%PDF"),
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Invalid(_)));
  assert!(s.assets(AssetKind::Gallery).await.unwrap().is_empty());
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_reads_review_text() {
  let s = store().await;
  s.add_restaurant(restaurant("Candlenut", "Peranakan", 4.4))
    .await
    .unwrap();
  s.add_restaurant(restaurant("Burnt Ends", "Barbecue", 4.6))
    .await
    .unwrap();
  s.add_review(review("Burnt Ends", "The leek was unforgettable.", 5.0))
    .await
    .unwrap();

  let query = RestaurantQuery {
    text: Some("leek".into()),
    ..Default::default()
  };
  let found = s.search(&query).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].name, "Burnt Ends");
}
