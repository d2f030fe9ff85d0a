//! The `DirectoryStore` trait and the table names it persists.
//!
//! The trait is implemented by storage backends (e.g. `makan-store-sqlite`).
//! Higher layers (`makan-api`, `makan-server`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
  asset::{Asset, AssetKind, NewAsset},
  restaurant::{NewRestaurant, Restaurant},
  review::{NewReview, Review},
  search::{RestaurantQuery, find_restaurants},
};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// The four persisted tables.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TableKind {
  Restaurants,
  Reviews,
  Menus,
  Gallery,
}

impl TableKind {
  /// File name offered when the table is downloaded.
  pub fn export_file_name(self) -> &'static str {
    match self {
      Self::Restaurants => "restaurants_database.csv",
      Self::Reviews => "restaurant_reviews.csv",
      Self::Menus => "restaurant_menus.csv",
      Self::Gallery => "restaurant_gallery.csv",
    }
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Broad cause of a failed store operation, used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The input failed validation.
  Invalid,
  /// The write collides with an existing restaurant name.
  Conflict,
  /// Anything else; not the caller's fault.
  Internal,
}

/// Implemented by every [`DirectoryStore::Error`].
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Makan directory backend.
///
/// Reviews and assets are append-only. Restaurants are append-only apart from
/// [`DirectoryStore::replace_restaurants`], which swaps the whole table.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DirectoryStore: Send + Sync {
  type Error: StoreError;

  // ── Restaurants ───────────────────────────────────────────────────────

  /// All restaurants in insertion order.
  fn restaurants(
    &self,
  ) -> impl Future<Output = Result<Vec<Restaurant>, Self::Error>> + Send + '_;

  /// Retrieve one restaurant by name. Returns `None` if not found.
  fn get_restaurant<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Restaurant>, Self::Error>> + Send + 'a;

  /// Validate and persist a new restaurant.
  ///
  /// Returns an error, leaving the table unchanged, if the name is taken.
  fn add_restaurant(
    &self,
    input: NewRestaurant,
  ) -> impl Future<Output = Result<Restaurant, Self::Error>> + Send + '_;

  /// Atomically replace every restaurant. Returns an error, leaving the
  /// table unchanged, if `restaurants` repeats a name.
  fn replace_restaurants(
    &self,
    restaurants: Vec<Restaurant>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// All reviews in insertion order.
  fn reviews(
    &self,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  /// Reviews of one restaurant, newest first.
  fn reviews_for<'a>(
    &'a self,
    restaurant: &'a str,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + 'a;

  /// Validate and append a review. The timestamp is set by the store.
  fn add_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  // ── Assets ────────────────────────────────────────────────────────────

  /// All assets of `kind` in insertion order.
  fn assets(
    &self,
    kind: AssetKind,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + '_;

  /// Assets of `kind` for one restaurant, in insertion order.
  fn assets_for<'a>(
    &'a self,
    kind: AssetKind,
    restaurant: &'a str,
  ) -> impl Future<Output = Result<Vec<Asset>, Self::Error>> + Send + 'a;

  /// Validate and append an asset. The timestamp is set by the store.
  fn add_asset(
    &self,
    kind: AssetKind,
    input: NewAsset,
  ) -> impl Future<Output = Result<Asset, Self::Error>> + Send + '_;

  // ── Search ────────────────────────────────────────────────────────────

  /// Load restaurants and reviews and run [`find_restaurants`] over them.
  fn search<'a>(
    &'a self,
    query: &'a RestaurantQuery,
  ) -> impl Future<Output = Result<Vec<Restaurant>, Self::Error>> + Send + 'a {
    async move {
      let restaurants = self.restaurants().await?;
      let reviews = self.reviews().await?;
      Ok(find_restaurants(&restaurants, &reviews, query))
    }
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn table_names_round_trip() {
    for table in TableKind::iter() {
      assert_eq!(table.to_string().parse::<TableKind>().unwrap(), table);
    }
    assert_eq!(TableKind::Gallery.as_ref(), "gallery");
    assert!("photos".parse::<TableKind>().is_err());
  }

  #[test]
  fn export_file_names() {
    assert_eq!(TableKind::Reviews.export_file_name(), "restaurant_reviews.csv");
    assert_eq!(TableKind::Gallery.export_file_name(), "restaurant_gallery.csv");
  }
}
