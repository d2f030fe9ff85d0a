//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, and enumerations in their display form (`$$`, `Yes`, `menu`).

use chrono::{DateTime, Utc};
use makan_core::{
  asset::{Asset, AssetKind},
  restaurant::{PriceRange, PrivateRoom, Restaurant},
  review::Review,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_asset_kind(kind: AssetKind) -> &'static str { kind.into() }

fn corrupt(column: &'static str, value: String) -> Error {
  Error::Corrupt { column, value }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const RESTAURANT_COLUMNS: &str = "name, cuisine, location, rating, price_range, \
   description, image, address, private_room, max_capacity";

/// Raw values read directly from a `restaurants` row.
pub struct RawRestaurant {
  pub name:         String,
  pub cuisine:      String,
  pub location:     String,
  pub rating:       f64,
  pub price_range:  String,
  pub description:  String,
  pub image:        String,
  pub address:      String,
  pub private_room: String,
  pub max_capacity: Option<u32>,
}

impl RawRestaurant {
  /// Read the columns in [`RESTAURANT_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:         row.get(0)?,
      cuisine:      row.get(1)?,
      location:     row.get(2)?,
      rating:       row.get(3)?,
      price_range:  row.get(4)?,
      description:  row.get(5)?,
      image:        row.get(6)?,
      address:      row.get(7)?,
      private_room: row.get(8)?,
      max_capacity: row.get(9)?,
    })
  }

  pub fn into_restaurant(self) -> Result<Restaurant> {
    let price_range = self
      .price_range
      .parse::<PriceRange>()
      .map_err(|_| corrupt("price_range", self.price_range.clone()))?;
    let private_room = self
      .private_room
      .parse::<PrivateRoom>()
      .map_err(|_| corrupt("private_room", self.private_room.clone()))?;

    Ok(Restaurant {
      name: self.name,
      cuisine: self.cuisine,
      location: self.location,
      rating: self.rating,
      price_range,
      description: self.description,
      image: self.image,
      address: self.address,
      private_room,
      max_capacity: self.max_capacity,
    })
  }
}

/// Insert `r`, skipping it if the name is already taken.
///
/// Returns the number of rows written, so `0` signals a duplicate.
pub fn insert_restaurant(
  conn: &rusqlite::Connection,
  r: &Restaurant,
) -> rusqlite::Result<usize> {
  conn.execute(
    &format!(
      "INSERT OR IGNORE INTO restaurants ({RESTAURANT_COLUMNS})
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
    ),
    rusqlite::params![
      r.name,
      r.cuisine,
      r.location,
      r.rating,
      r.price_range.to_string(),
      r.description,
      r.image,
      r.address,
      r.private_room.to_string(),
      r.private_room_capacity(),
    ],
  )
}

pub const REVIEW_COLUMNS: &str = "review_id, restaurant_name, rating, review_text, \
   reviewer_name, reviewer_department, reviewer_designation, timestamp";

/// Raw values read directly from a `reviews` row.
pub struct RawReview {
  pub review_id:            String,
  pub restaurant_name:      String,
  pub rating:               f64,
  pub review_text:          String,
  pub reviewer_name:        String,
  pub reviewer_department:  String,
  pub reviewer_designation: String,
  pub timestamp:            String,
}

impl RawReview {
  /// Read the columns in [`REVIEW_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      review_id:            row.get(0)?,
      restaurant_name:      row.get(1)?,
      rating:               row.get(2)?,
      review_text:          row.get(3)?,
      reviewer_name:        row.get(4)?,
      reviewer_department:  row.get(5)?,
      reviewer_designation: row.get(6)?,
      timestamp:            row.get(7)?,
    })
  }

  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      review_id:            decode_uuid(&self.review_id)?,
      restaurant_name:      self.restaurant_name,
      rating:               self.rating,
      review_text:          self.review_text,
      reviewer_name:        self.reviewer_name,
      reviewer_department:  self.reviewer_department,
      reviewer_designation: self.reviewer_designation,
      timestamp:            decode_dt(&self.timestamp)?,
    })
  }
}

pub const ASSET_COLUMNS: &str =
  "asset_id, kind, restaurant_name, file_name, file_type, base64_data, timestamp";

/// Raw values read directly from an `assets` row.
pub struct RawAsset {
  pub asset_id:        String,
  pub kind:            String,
  pub restaurant_name: String,
  pub file_name:       String,
  pub file_type:       String,
  pub base64_data:     String,
  pub timestamp:       String,
}

impl RawAsset {
  /// Read the columns in [`ASSET_COLUMNS`] order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      asset_id:        row.get(0)?,
      kind:            row.get(1)?,
      restaurant_name: row.get(2)?,
      file_name:       row.get(3)?,
      file_type:       row.get(4)?,
      base64_data:     row.get(5)?,
      timestamp:       row.get(6)?,
    })
  }

  pub fn into_asset(self) -> Result<Asset> {
    let kind = self
      .kind
      .parse::<AssetKind>()
      .map_err(|_| corrupt("kind", self.kind.clone()))?;

    Ok(Asset {
      asset_id: decode_uuid(&self.asset_id)?,
      kind,
      restaurant_name: self.restaurant_name,
      file_name: self.file_name,
      file_type: self.file_type,
      base64_data: self.base64_data,
      timestamp: decode_dt(&self.timestamp)?,
    })
  }
}
