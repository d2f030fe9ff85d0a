//! Text summary of a restaurant as shown on its card.

use serde::{Deserialize, Serialize};

use crate::restaurant::{PrivateRoom, Restaurant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantCard {
  pub name:         String,
  pub description:  String,
  pub image:        String,
  pub cuisine:      String,
  pub location:     String,
  pub address:      String,
  /// One decimal place, e.g. `4.5`.
  pub rating:       String,
  pub price:        String,
  /// `Yes (Max Capacity: 16)`, `Yes`, or `No`.
  pub private_room: String,
}

impl RestaurantCard {
  pub fn new(r: &Restaurant) -> Self {
    let private_room = match (r.private_room, r.max_capacity) {
      (PrivateRoom::Yes, Some(cap)) => format!("Yes (Max Capacity: {cap})"),
      (room, _) => room.to_string(),
    };

    Self {
      name: r.name.clone(),
      description: r.description.clone(),
      image: r.image.clone(),
      cuisine: r.cuisine.clone(),
      location: r.location.clone(),
      address: r.address.clone(),
      rating: format!("{:.1}", r.rating),
      price: r.price_range.to_string(),
      private_room,
    }
  }
}

impl From<&Restaurant> for RestaurantCard {
  fn from(r: &Restaurant) -> Self { Self::new(r) }
}
