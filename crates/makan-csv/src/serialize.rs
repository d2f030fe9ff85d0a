//! Table serializer.
//!
//! Writes a header row followed by one record per item, LF-terminated. Fields
//! are quoted only when they contain a delimiter, a quote, or a line break.

use chrono::{DateTime, Utc};
use makan_core::{
  asset::Asset,
  restaurant::{PrivateRoom, Restaurant},
  review::Review,
};

use crate::{ASSET_COLUMNS, RESTAURANT_COLUMNS, REVIEW_COLUMNS, TIMESTAMP_FORMAT};

// ─── Field helpers ───────────────────────────────────────────────────────────

fn escape_field(s: &str) -> String {
  if s.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", s.replace('"', "\"\""))
  } else {
    s.to_owned()
  }
}

fn push_record<I, S>(out: &mut String, fields: I)
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  for (i, field) in fields.into_iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    out.push_str(&escape_field(field.as_ref()));
  }
  out.push('\n');
}

/// Whole-number ratings keep one decimal place (`5.0`, not `5`).
fn format_rating(rating: f64) -> String {
  if rating.fract() == 0.0 {
    format!("{rating:.1}")
  } else {
    rating.to_string()
  }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
  ts.format(TIMESTAMP_FORMAT).to_string()
}

// ─── Tables ──────────────────────────────────────────────────────────────────

pub(crate) fn restaurants(restaurants: &[Restaurant]) -> String {
  let mut out = String::new();
  push_record(&mut out, RESTAURANT_COLUMNS);
  for r in restaurants {
    let capacity = match r.private_room {
      PrivateRoom::Yes => r.max_capacity.map(|c| c.to_string()),
      PrivateRoom::No => None,
    };
    push_record(&mut out, [
      r.name.clone(),
      r.cuisine.clone(),
      r.location.clone(),
      format_rating(r.rating),
      r.price_range.to_string(),
      r.description.clone(),
      r.image.clone(),
      r.address.clone(),
      r.private_room.to_string(),
      capacity.unwrap_or_default(),
    ]);
  }
  out
}

pub(crate) fn reviews(reviews: &[Review]) -> String {
  let mut out = String::new();
  push_record(&mut out, REVIEW_COLUMNS);
  for r in reviews {
    push_record(&mut out, [
      r.restaurant_name.clone(),
      format_rating(r.rating),
      r.review_text.clone(),
      r.reviewer_name.clone(),
      r.reviewer_department.clone(),
      r.reviewer_designation.clone(),
      format_timestamp(&r.timestamp),
    ]);
  }
  out
}

pub(crate) fn assets(assets: &[Asset]) -> String {
  let mut out = String::new();
  push_record(&mut out, ASSET_COLUMNS);
  for a in assets {
    let timestamp = format_timestamp(&a.timestamp);
    push_record(&mut out, [
      a.restaurant_name.as_str(),
      a.file_name.as_str(),
      a.file_type.as_str(),
      a.base64_data.as_str(),
      timestamp.as_str(),
    ]);
  }
  out
}
