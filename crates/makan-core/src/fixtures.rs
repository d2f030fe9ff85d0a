//! Sample directory shared by the unit tests.

use chrono::Utc;
use uuid::Uuid;

use crate::{
  restaurant::{PLACEHOLDER_IMAGE, PriceRange, PrivateRoom, Restaurant},
  review::Review,
};

fn restaurant(
  name: &str,
  cuisine: &str,
  location: &str,
  rating: f64,
  price_range: PriceRange,
  description: &str,
  max_capacity: Option<u32>,
) -> Restaurant {
  Restaurant {
    name: name.into(),
    cuisine: cuisine.into(),
    location: location.into(),
    rating,
    price_range,
    description: description.into(),
    image: PLACEHOLDER_IMAGE.into(),
    address: format!("1 {location} Road"),
    private_room: if max_capacity.is_some() {
      PrivateRoom::Yes
    } else {
      PrivateRoom::No
    },
    max_capacity,
  }
}

pub fn restaurants() -> Vec<Restaurant> {
  vec![
    restaurant(
      "Les Amis",
      "French",
      "Shenton Way",
      4.8,
      PriceRange::Luxury,
      "Refined French fine dining with a private salon.",
      Some(16),
    ),
    restaurant(
      "Odette",
      "French",
      "City Hall",
      5.0,
      PriceRange::Luxury,
      "Modern French cuisine at the National Gallery.",
      Some(12),
    ),
    restaurant(
      "Jumbo Seafood",
      "Seafood",
      "Clarke Quay",
      4.2,
      PriceRange::Expensive,
      "Famous for Chili Crab by the river.",
      None,
    ),
    restaurant(
      "Burnt Ends",
      "Barbecue",
      "Dempsey",
      4.6,
      PriceRange::Expensive,
      "Wood-fired Australian barbecue.",
      None,
    ),
  ]
}

pub fn review(restaurant_name: &str, text: &str) -> Review {
  Review {
    review_id:            Uuid::new_v4(),
    restaurant_name:      restaurant_name.into(),
    rating:               4.0,
    review_text:          text.into(),
    reviewer_name:        "Tester".into(),
    reviewer_department:  String::new(),
    reviewer_designation: String::new(),
    timestamp:            Utc::now(),
  }
}
