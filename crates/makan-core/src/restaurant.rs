//! Restaurant records — the rows every other table refers to by name.
//!
//! A restaurant is created once and never updated in place. Its `name` is the
//! primary key; reviews and assets reference it by plain string equality.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result};

/// Image shown when a restaurant was added without a photo.
pub const PLACEHOLDER_IMAGE: &str =
  "https://placehold.co/600x400/CCCCCC/000000?text=Image+Not+Available";

/// Capacity assumed when a private room is declared without one.
pub const DEFAULT_PRIVATE_ROOM_CAPACITY: u32 = 10;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Price band, written as one to four dollar signs.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
pub enum PriceRange {
  #[serde(rename = "$")]
  #[strum(serialize = "$")]
  Budget,
  #[serde(rename = "$$")]
  #[strum(serialize = "$$")]
  Moderate,
  #[serde(rename = "$$$")]
  #[strum(serialize = "$$$")]
  Expensive,
  #[serde(rename = "$$$$")]
  #[strum(serialize = "$$$$")]
  Luxury,
}

impl PriceRange {
  pub fn parse(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownPriceRange(s.to_owned()))
  }
}

/// Whether the restaurant offers a private dining room.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
pub enum PrivateRoom {
  Yes,
  #[default]
  No,
}

impl PrivateRoom {
  /// Parse the stored `Yes`/`No` form; a blank value means `No`.
  pub fn parse(s: &str) -> Result<Self> {
    let s = s.trim();
    if s.is_empty() {
      return Ok(Self::No);
    }
    s.parse().map_err(|_| Error::UnknownPrivateRoom(s.to_owned()))
  }
}

// ─── Restaurant ──────────────────────────────────────────────────────────────

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
  pub name:         String,
  pub cuisine:      String,
  pub location:     String,
  pub rating:       f64,
  pub price_range:  PriceRange,
  pub description:  String,
  /// An `http(s)` URL or a `data:<mime>;base64,<payload>` URL.
  pub image:        String,
  pub address:      String,
  pub private_room: PrivateRoom,
  /// Only meaningful when `private_room` is [`PrivateRoom::Yes`].
  pub max_capacity: Option<u32>,
}

impl Restaurant {
  /// Capacity of the private room, if there is one and it is known.
  pub fn private_room_capacity(&self) -> Option<u32> {
    match self.private_room {
      PrivateRoom::Yes => self.max_capacity,
      PrivateRoom::No => None,
    }
  }
}

// ─── NewRestaurant ───────────────────────────────────────────────────────────

/// Input to [`crate::store::DirectoryStore::add_restaurant`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRestaurant {
  pub name:         String,
  pub cuisine:      String,
  pub location:     String,
  pub rating:       f64,
  pub price_range:  PriceRange,
  pub description:  String,
  pub address:      String,
  /// Image URL; `None` selects [`PLACEHOLDER_IMAGE`].
  #[serde(default)]
  pub image:        Option<String>,
  #[serde(default)]
  pub private_room: PrivateRoom,
  #[serde(default)]
  pub max_capacity: Option<u32>,
}

impl NewRestaurant {
  /// Check required fields and ranges, producing the record to persist.
  pub fn validate(self) -> Result<Restaurant> {
    let name = required("name", self.name)?;
    let cuisine = required("cuisine", self.cuisine)?;
    let location = required("location", self.location)?;
    let description = required("description", self.description)?;
    let address = required("address", self.address)?;
    check_rating("rating", self.rating)?;

    let max_capacity = match self.private_room {
      PrivateRoom::Yes => {
        let capacity = self.max_capacity.unwrap_or(DEFAULT_PRIVATE_ROOM_CAPACITY);
        if capacity == 0 {
          return Err(Error::InvalidCapacity);
        }
        Some(capacity)
      }
      PrivateRoom::No => None,
    };

    let image = self
      .image
      .map(|s| s.trim().to_owned())
      .filter(|s| !s.is_empty())
      .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_owned());

    Ok(Restaurant {
      name,
      cuisine,
      location,
      rating: self.rating,
      price_range: self.price_range,
      description,
      image,
      address,
      private_room: self.private_room,
      max_capacity,
    })
  }
}

/// Build a `data:` URL embedding an uploaded image.
pub fn image_data_url(file_type: &str, bytes: &[u8]) -> String {
  format!("data:{file_type};base64,{}", B64.encode(bytes))
}

// ─── Validation helpers ──────────────────────────────────────────────────────

pub(crate) fn required(field: &'static str, value: String) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(Error::MissingField(field))
  } else {
    Ok(trimmed.to_owned())
  }
}

pub(crate) fn check_rating(field: &'static str, value: f64) -> Result<()> {
  if (0.0..=5.0).contains(&value) {
    Ok(())
  } else {
    Err(Error::RatingOutOfRange { field, value })
  }
}
