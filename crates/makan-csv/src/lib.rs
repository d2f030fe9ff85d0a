//! CSV codec for the Makan tables.
//!
//! Converts between comma-separated text and [`makan_core`] domain types. Pure
//! synchronous; no HTTP or database dependencies. This is the format of the
//! table downloads and of the restaurant table an administrator may upload.
//!
//! # Quick start
//!
//! ```no_run
//! let csv = "Name,Cuisine,Location,Rating,Price Range,Description,Image,Address\n\
//!            Odette,French,City Hall,5.0,$$$$,Modern French,,1 St Andrew's Rd\n";
//! let restaurants = makan_csv::parse_restaurants(csv).unwrap();
//! println!("{} restaurants", restaurants.len());
//! ```

pub mod error;
mod parse;
mod serialize;

pub use error::{Error, Result};
use makan_core::{asset::Asset, restaurant::Restaurant, review::Review};

// ─── Column names ────────────────────────────────────────────────────────────

pub const RESTAURANT_COLUMNS: [&str; 10] = [
  "Name",
  "Cuisine",
  "Location",
  "Rating",
  "Price Range",
  "Description",
  "Image",
  "Address",
  "Private Room",
  "Max Capacity",
];

pub const REVIEW_COLUMNS: [&str; 7] = [
  "restaurant_name",
  "rating",
  "review_text",
  "reviewer_name",
  "reviewer_department",
  "reviewer_designation",
  "timestamp",
];

pub const ASSET_COLUMNS: [&str; 5] =
  ["restaurant_name", "file_name", "file_type", "base64_data", "timestamp"];

/// Format used for timestamp columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a restaurant table.
///
/// Columns may appear in any order. `Private Room` and `Max Capacity` are
/// back-filled when absent (`No` and no capacity); a `Max Capacity` that does
/// not hold a positive whole number is treated as unknown.
pub fn parse_restaurants(input: &str) -> Result<Vec<Restaurant>> {
  parse::parse_restaurants(input)
}

pub fn serialize_restaurants(restaurants: &[Restaurant]) -> String {
  serialize::restaurants(restaurants)
}

pub fn serialize_reviews(reviews: &[Review]) -> String {
  serialize::reviews(reviews)
}

/// Serialize menu or gallery assets; both tables share one layout.
pub fn serialize_assets(assets: &[Asset]) -> String {
  serialize::assets(assets)
}

// ─── Round-trip test ─────────────────────────────────────────────────────────
