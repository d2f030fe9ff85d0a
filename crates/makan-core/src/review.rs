//! Reviews — append-only opinions attached to a restaurant by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  restaurant::{check_rating, required},
};

/// A stored review. Never edited or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub review_id:            Uuid,
  /// Not enforced as a foreign key.
  pub restaurant_name:      String,
  pub rating:               f64,
  pub review_text:          String,
  pub reviewer_name:        String,
  pub reviewer_department:  String,
  pub reviewer_designation: String,
  /// Server-assigned; never changes after creation.
  pub timestamp:            DateTime<Utc>,
}

/// Input to [`crate::store::DirectoryStore::add_review`].
/// `timestamp` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
  pub restaurant_name:      String,
  pub rating:               f64,
  pub review_text:          String,
  pub reviewer_name:        String,
  #[serde(default)]
  pub reviewer_department:  String,
  #[serde(default)]
  pub reviewer_designation: String,
}

impl NewReview {
  /// Check required fields, stamping the review with `timestamp`.
  pub fn validate(self, timestamp: DateTime<Utc>) -> Result<Review> {
    let restaurant_name = required("restaurant_name", self.restaurant_name)?;
    let reviewer_name = required("reviewer_name", self.reviewer_name)?;
    let review_text = required("review_text", self.review_text)?;
    check_rating("rating", self.rating)?;

    Ok(Review {
      review_id: Uuid::new_v4(),
      restaurant_name,
      rating: self.rating,
      review_text,
      reviewer_name,
      reviewer_department: self.reviewer_department.trim().to_owned(),
      reviewer_designation: self.reviewer_designation.trim().to_owned(),
      timestamp,
    })
  }
}

impl Review {
  /// Comma-joined reviewer attribution, skipping empty parts.
  pub fn attribution(&self) -> String {
    [
      self.reviewer_name.as_str(),
      self.reviewer_department.as_str(),
      self.reviewer_designation.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
  }
}

/// Order reviews newest first. The sort is stable, so callers that pass rows
/// in insertion order get later insertions first among equal timestamps.
pub fn newest_first(reviews: &mut [Review]) {
  reviews.reverse();
  reviews.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
