//! Per-session presentation state.
//!
//! A client keeps one [`SessionState`] per user session and passes it to its
//! rendering code explicitly. Nothing here is shared between sessions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ─── Forms ───────────────────────────────────────────────────────────────────

/// The single form a session may have open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", content = "restaurant", rename_all = "snake_case")]
pub enum OpenForm {
  AddRestaurant,
  Review(String),
  MenuUpload(String),
  PhotoUpload(String),
}

impl OpenForm {
  /// The restaurant the form belongs to, if any.
  pub fn restaurant(&self) -> Option<&str> {
    match self {
      Self::AddRestaurant => None,
      Self::Review(name) | Self::MenuUpload(name) | Self::PhotoUpload(name) => {
        Some(name.as_str())
      }
    }
  }
}

// ─── Gallery ─────────────────────────────────────────────────────────────────

/// Position within one restaurant's photo gallery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryCursor {
  index: usize,
}

impl GalleryCursor {
  /// Current index, clamped to a gallery of `len` photos.
  pub fn index(&self, len: usize) -> usize { self.index.min(len.saturating_sub(1)) }

  pub fn can_prev(&self, len: usize) -> bool { self.index(len) > 0 }

  pub fn can_next(&self, len: usize) -> bool { self.index(len) + 1 < len }

  pub fn prev(&mut self, len: usize) {
    if self.can_prev(len) {
      self.index = self.index(len) - 1;
    }
  }

  pub fn next(&mut self, len: usize) {
    if self.can_next(len) {
      self.index = self.index(len) + 1;
    }
  }

  /// `"2 of 5"`; `None` for an empty gallery.
  pub fn label(&self, len: usize) -> Option<String> {
    (len > 0).then(|| format!("{} of {len}", self.index(len) + 1))
  }
}

// ─── SessionState ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
  open_form: Option<OpenForm>,
  /// Confirmation shown once on the card of the restaurant just reviewed.
  flash:     Option<(String, String)>,
  galleries: HashMap<String, GalleryCursor>,
}

impl SessionState {
  pub fn new() -> Self { Self::default() }

  pub fn open_form(&self) -> Option<&OpenForm> { self.open_form.as_ref() }

  /// Open `form`, closing whichever form was open before.
  pub fn open(&mut self, form: OpenForm) {
    if matches!(form, OpenForm::Review(_)) {
      self.flash = None;
    }
    self.open_form = Some(form);
  }

  pub fn close(&mut self) { self.open_form = None; }

  pub fn is_open(&self, form: &OpenForm) -> bool {
    self.open_form.as_ref() == Some(form)
  }

  /// Close the review form after a successful submission and queue the
  /// thank-you message for that restaurant's card.
  pub fn review_submitted(&mut self, restaurant: &str, rating: f64) {
    self.open_form = None;
    self.flash = Some((
      restaurant.to_owned(),
      format!("Thank you for your review of {restaurant}! Rating: {rating:.1}"),
    ));
  }

  /// Take the pending message if it belongs to `restaurant`.
  pub fn take_flash_for(&mut self, restaurant: &str) -> Option<String> {
    let pending = self.open_form.is_none()
      && self
        .flash
        .as_ref()
        .is_some_and(|(name, _)| name == restaurant);
    if pending {
      self.flash.take().map(|(_, msg)| msg)
    } else {
      None
    }
  }

  /// The gallery cursor for `restaurant`, created at the first photo.
  pub fn gallery(&mut self, restaurant: &str) -> &mut GalleryCursor {
    self.galleries.entry(restaurant.to_owned()).or_default()
  }

  /// Read-only view of `restaurant`'s gallery position.
  pub fn gallery_at(&self, restaurant: &str) -> GalleryCursor {
    self.galleries.get(restaurant).copied().unwrap_or_default()
  }
}
