//! Restaurant search and filtering.
//!
//! A free-text query is split into terms; each term is matched
//! case-insensitively against a restaurant's name, its description, and the
//! text of every review written about it. Categorical and numeric filters are
//! applied to whatever the text search leaves.
//!
//! Query syntax:
//!
//! | Query | Meaning |
//! |-------|---------|
//! | `crab` | substring match |
//! | `"chili crab"` | the literal phrase, as one substring |
//! | `crab & view` | every term must match (AND) |
//! | `crab, laksa` | any term may match (OR) |
//!
//! `&` takes precedence: a query containing `&` anywhere is split only on
//! `&`, and commas inside it are ordinary characters.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::{
  restaurant::{PriceRange, PrivateRoom, Restaurant},
  review::Review,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`find_restaurants`]. `None` on a categorical filter means
/// "All".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantQuery {
  /// Free-text search over name, description and review text.
  pub text:         Option<String>,
  pub cuisine:      Option<String>,
  pub location:     Option<String>,
  pub price_range:  Option<PriceRange>,
  /// Restaurants rated below this are excluded.
  #[serde(default)]
  pub min_rating:   f64,
  pub private_room: Option<PrivateRoom>,
  /// Only consulted when `private_room` is `Some(PrivateRoom::Yes)`.
  pub min_capacity: Option<u32>,
}

/// How the terms of a query combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
  All,
  Any,
}

/// One unit of a parsed search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
  pub text:   String,
  /// Whether the term was written between double quotes.
  pub quoted: bool,
}

impl Term {
  fn parse(raw: &str) -> Self {
    let raw = raw.trim();
    if raw.starts_with('"') && raw.ends_with('"') {
      Self {
        text:   raw.trim_matches('"').to_lowercase(),
        quoted: true,
      }
    } else {
      Self {
        text:   raw.to_lowercase(),
        quoted: false,
      }
    }
  }

  /// Case-insensitive containment; `haystack` must already be lowercase.
  fn found_in(&self, haystack: &str) -> bool { haystack.contains(&self.text) }
}

/// A tokenized free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
  pub mode:  MatchMode,
  pub terms: Vec<Term>,
}

/// Tokenize a free-text query. Returns `None` for a blank query.
///
/// There is no reject path: anything that is not blank yields at least one
/// term.
pub fn parse_query(query: &str) -> Option<SearchQuery> {
  if query.trim().is_empty() {
    return None;
  }

  let (mode, separator) = if query.contains('&') {
    (MatchMode::All, '&')
  } else {
    (MatchMode::Any, ',')
  };

  let terms = query.split(separator).map(Term::parse).collect();
  Some(SearchQuery { mode, terms })
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Lowercased searchable text of one restaurant.
struct Haystack<'a> {
  restaurant:  &'a Restaurant,
  name:        String,
  description: String,
}

/// Names of the restaurants matching a single term.
fn term_matches<'a>(
  term: &Term,
  haystacks: &[Haystack<'a>],
  review_texts: &[(&str, String)],
) -> HashSet<&'a str> {
  let reviewed: HashSet<&str> = review_texts
    .iter()
    .filter(|(_, text)| term.found_in(text))
    .map(|(name, _)| *name)
    .collect();

  haystacks
    .iter()
    .filter(|h| {
      term.found_in(&h.name)
        || term.found_in(&h.description)
        || reviewed.contains(h.restaurant.name.as_str())
    })
    .map(|h| h.restaurant.name.as_str())
    .collect()
}

/// Apply the text search; returns the names that survive.
fn text_search<'a>(
  query: &SearchQuery,
  restaurants: &'a [Restaurant],
  reviews: &[Review],
) -> HashSet<&'a str> {
  let haystacks: Vec<Haystack<'_>> = restaurants
    .iter()
    .map(|r| Haystack {
      restaurant:  r,
      name:        r.name.to_lowercase(),
      description: r.description.to_lowercase(),
    })
    .collect();

  let review_texts: Vec<(&str, String)> = reviews
    .iter()
    .map(|r| (r.restaurant_name.as_str(), r.review_text.to_lowercase()))
    .collect();

  let mut per_term = query
    .terms
    .iter()
    .map(|term| term_matches(term, &haystacks, &review_texts));

  let Some(first) = per_term.next() else {
    return HashSet::new();
  };

  match query.mode {
    MatchMode::All => per_term.fold(first, |acc, next| {
      acc.intersection(&next).copied().collect()
    }),
    MatchMode::Any => per_term.fold(first, |mut acc, next| {
      acc.extend(next);
      acc
    }),
  }
}

/// Return the restaurants satisfying every criterion of `query`.
///
/// The result keeps the relative order of `restaurants` and contains each
/// name at most once.
pub fn find_restaurants(
  restaurants: &[Restaurant],
  reviews: &[Review],
  query: &RestaurantQuery,
) -> Vec<Restaurant> {
  let matched = query
    .text
    .as_deref()
    .and_then(parse_query)
    .map(|q| text_search(&q, restaurants, reviews));

  let mut seen = HashSet::new();
  restaurants
    .iter()
    .filter(|r| matched.as_ref().is_none_or(|m| m.contains(r.name.as_str())))
    .filter(|&r| seen.insert(r.name.as_str()))
    .filter(|r| query.cuisine.as_ref().is_none_or(|c| &r.cuisine == c))
    .filter(|r| query.location.as_ref().is_none_or(|l| &r.location == l))
    .filter(|r| query.price_range.is_none_or(|p| r.price_range == p))
    .filter(|r| r.rating >= query.min_rating)
    .filter(|r| query.private_room.is_none_or(|p| r.private_room == p))
    .filter(|r| match (query.private_room, query.min_capacity) {
      (Some(PrivateRoom::Yes), Some(min)) => {
        r.max_capacity.is_some_and(|cap| cap >= min)
      }
      _ => true,
    })
    .cloned()
    .collect()
}

// ─── Filter options ──────────────────────────────────────────────────────────

/// The choices a client offers in its filter controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
  /// Sorted, de-duplicated.
  pub cuisines:                 Vec<String>,
  /// Sorted, de-duplicated.
  pub locations:                Vec<String>,
  pub price_ranges:             Vec<PriceRange>,
  /// Upper bound for a capacity slider; `None` when no private room has a
  /// known capacity.
  pub max_private_room_capacity: Option<u32>,
}

impl FilterOptions {
  pub fn from_restaurants(restaurants: &[Restaurant]) -> Self {
    let cuisines: BTreeSet<&str> =
      restaurants.iter().map(|r| r.cuisine.as_str()).collect();
    let locations: BTreeSet<&str> =
      restaurants.iter().map(|r| r.location.as_str()).collect();

    Self {
      cuisines:                 cuisines.into_iter().map(str::to_owned).collect(),
      locations:                locations.into_iter().map(str::to_owned).collect(),
      price_ranges:             PriceRange::iter().collect(),
      max_private_room_capacity: restaurants
        .iter()
        .filter_map(Restaurant::private_room_capacity)
        .max(),
    }
  }
}
