//! Application state machine and event dispatcher for `makan browse`.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use makan_core::{
  asset::{Asset, AssetKind},
  card::RestaurantCard,
  restaurant::{PriceRange, PrivateRoom, Restaurant},
  review::Review,
  search::FilterOptions,
  session::{OpenForm, SessionState},
};

use crate::{
  client::{ApiClient, SearchParams},
  form::{Form, Submission},
  upload::read_upload,
};

/// Minimum-rating steps offered by the `r` key.
const RATING_STEPS: [f64; 5] = [0.0, 3.0, 4.0, 4.5, 5.0];

/// Guest-count increment for the `n` key.
const CAPACITY_STEP: u32 = 5;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  RestaurantList,
  RestaurantDetail,
}

/// Everything shown in the detail pane for one restaurant.
pub struct Detail {
  pub card:    RestaurantCard,
  pub reviews: Vec<Review>,
  pub menus:   Vec<Asset>,
  pub gallery: Vec<Asset>,
  /// Thank-you line taken from the session after a review.
  pub flash:   Option<String>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,

  /// Search results for `params`, in table order.
  pub restaurants: Vec<Restaurant>,

  /// Choices for the filter keys, refreshed with every search.
  pub filters: FilterOptions,

  /// Active search and filter constraints.
  pub params: SearchParams,

  /// Free-text query being typed (only while `query_active`).
  pub query: String,

  pub query_active: bool,

  pub list_cursor: usize,

  pub detail_scroll: u16,

  pub detail: Option<Detail>,

  /// Input buffer for the form recorded in `session`.
  pub form: Option<Form>,

  /// Open form, review confirmation, and gallery positions.
  pub session: SessionState,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: Arc<ApiClient>,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::RestaurantList,
      restaurants: Vec::new(),
      filters: FilterOptions::default(),
      params: SearchParams::default(),
      query: String::new(),
      query_active: false,
      list_cursor: 0,
      detail_scroll: 0,
      detail: None,
      form: None,
      session: SessionState::new(),
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Run the current search and refresh the filter choices.
  pub async fn load_restaurants(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading restaurants…".into();
    let result = async {
      let restaurants = self.client.search(&self.params).await?;
      let filters = self.client.filters().await?;
      anyhow::Ok((restaurants, filters))
    }
    .await;
    match result {
      Ok((restaurants, filters)) => {
        self.restaurants = restaurants;
        self.filters = filters;
        self.list_cursor = 0;
        self.status_msg = if self.restaurants.is_empty() {
          "No restaurants match the selected filters.".into()
        } else {
          String::new()
        };
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  async fn load_detail(&mut self, name: &str) -> anyhow::Result<Detail> {
    let restaurant = self.client.restaurant(name).await?;
    let reviews = self.client.reviews(name).await?;
    let menus = self.client.assets(AssetKind::Menu, name).await?;
    let gallery = self.client.assets(AssetKind::Gallery, name).await?;
    Ok(Detail {
      card: RestaurantCard::new(&restaurant),
      reviews,
      menus,
      gallery,
      flash: self.session.take_flash_for(name),
    })
  }

  /// Transition to `RestaurantDetail` for `name`.
  async fn open_detail(&mut self, name: &str) {
    self.status_msg = "Loading…".into();
    match self.load_detail(name).await {
      Ok(detail) => {
        self.detail = Some(detail);
        self.detail_scroll = 0;
        self.screen = Screen::RestaurantDetail;
        self.status_msg = String::new();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  pub fn cursor_restaurant(&self) -> Option<&Restaurant> {
    self.restaurants.get(self.list_cursor)
  }

  fn selected_name(&self) -> Option<String> {
    self.detail.as_ref().map(|d| d.card.name.clone())
  }

  /// `(index, len)` of the selected restaurant's gallery.
  pub fn gallery_position(&self) -> Option<(usize, usize)> {
    let detail = self.detail.as_ref()?;
    let len = detail.gallery.len();
    let cursor = self.session.gallery_at(&detail.card.name);
    Some((cursor.index(len), len))
  }

  fn filtering_private_rooms(&self) -> bool {
    let yes: &str = PrivateRoom::Yes.as_ref();
    self.params.private_room.as_deref() == Some(yes)
  }

  /// Human-readable summary of the active constraints.
  pub fn filter_summary(&self) -> String {
    let p = &self.params;
    let mut parts = Vec::new();
    if let Some(q) = &p.q {
      parts.push(format!("\"{q}\""));
    }
    for v in [&p.cuisine, &p.location, &p.price_range].into_iter().flatten() {
      parts.push(v.clone());
    }
    if let Some(r) = p.min_rating.filter(|r| *r > 0.0) {
      parts.push(format!("≥{r:.1}★"));
    }
    if let Some(room) = &p.private_room {
      parts.push(format!("private room: {room}"));
    }
    if let Some(guests) = p.min_capacity {
      parts.push(format!("≥{guests} guests"));
    }
    parts.join("  ")
  }

  // ── Forms ─────────────────────────────────────────────────────────────────

  fn open_form(&mut self, kind: OpenForm) {
    self.session.open(kind.clone());
    if let Some(detail) = &mut self.detail {
      detail.flash = None;
    }
    self.form = Some(Form::new(kind));
  }

  fn close_form(&mut self) {
    self.session.close();
    self.form = None;
  }

  async fn submit_form(&mut self) {
    let Some(form) = &self.form else { return };
    let submission = match form.submission() {
      Ok(s) => s,
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        return;
      }
    };

    match self.send(submission).await {
      Ok(Some(reviewed)) => {
        self.form = None;
        self.open_detail(&reviewed).await;
      }
      Ok(None) => {
        self.close_form();
        let name = self.selected_name();
        let message = std::mem::take(&mut self.status_msg);
        match name {
          Some(name) => self.open_detail(&name).await,
          None => {
            self.load_restaurants().await.ok();
          }
        }
        self.status_msg = message;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  /// Send a submission. Returns the restaurant name after a review so the
  /// caller can show the confirmation on its card.
  async fn send(&mut self, submission: Submission) -> anyhow::Result<Option<String>> {
    match submission {
      Submission::Restaurant(input) => {
        let created = self.client.add_restaurant(&input).await?;
        self.status_msg = format!("Added {}", created.name);
        Ok(None)
      }
      Submission::Review(input) => {
        let review = self.client.add_review(&input).await?;
        self
          .session
          .review_submitted(&review.restaurant_name, review.rating);
        Ok(Some(review.restaurant_name))
      }
      Submission::Upload { kind, restaurant, path } => {
        let upload = read_upload(&restaurant, &path).await?;
        let asset = self.client.upload(kind, &upload).await?;
        self.status_msg = format!("Uploaded {}", asset.file_name);
        Ok(None)
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.form.is_some() {
      self.handle_form_key(key).await;
      return Ok(true);
    }

    if self.query_active {
      return self.handle_query_key(key).await;
    }

    match self.screen {
      Screen::RestaurantList => self.handle_list_key(key).await,
      Screen::RestaurantDetail => self.handle_detail_key(key).await,
    }
  }

  async fn handle_form_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.close_form(),
      KeyCode::Enter => self.submit_form().await,
      code => {
        let Some(form) = &mut self.form else { return };
        match code {
          KeyCode::Tab | KeyCode::Down => form.focus_next(),
          KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
          KeyCode::Backspace => form.pop(),
          KeyCode::Char(c) => form.push(c),
          _ => {}
        }
      }
    }
  }

  async fn handle_query_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => {
        self.query_active = false;
        self.query.clear();
      }
      KeyCode::Enter => {
        self.query_active = false;
        let q = self.query.trim();
        self.params.q = (!q.is_empty()).then(|| q.to_owned());
        self.load_restaurants().await.ok();
      }
      KeyCode::Backspace => {
        self.query.pop();
      }
      KeyCode::Char(c) => self.query.push(c),
      _ => {}
    }
    Ok(true)
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.restaurants.len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(name) = self.cursor_restaurant().map(|r| r.name.clone()) {
          self.open_detail(&name).await;
        }
      }

      KeyCode::Char('/') => {
        self.query_active = true;
        self.query = self.params.q.clone().unwrap_or_default();
      }

      KeyCode::Char('a') => self.open_form(OpenForm::AddRestaurant),

      // Filters
      KeyCode::Char('c') => {
        self.params.cuisine = cycle(&self.params.cuisine, &self.filters.cuisines);
        self.load_restaurants().await.ok();
      }
      KeyCode::Char('o') => {
        self.params.location = cycle(&self.params.location, &self.filters.locations);
        self.load_restaurants().await.ok();
      }
      KeyCode::Char('$') => {
        let ranges: Vec<String> = self
          .filters
          .price_ranges
          .iter()
          .map(PriceRange::to_string)
          .collect();
        self.params.price_range = cycle(&self.params.price_range, &ranges);
        self.load_restaurants().await.ok();
      }
      KeyCode::Char('r') => {
        self.params.min_rating = next_rating(self.params.min_rating);
        self.load_restaurants().await.ok();
      }
      KeyCode::Char('p') => {
        let rooms = [PrivateRoom::Yes.to_string(), PrivateRoom::No.to_string()];
        self.params.private_room = cycle(&self.params.private_room, &rooms);
        // A guest count only constrains restaurants with a private room.
        if !self.filtering_private_rooms() {
          self.params.min_capacity = None;
        }
        self.load_restaurants().await.ok();
      }
      KeyCode::Char('n') => {
        if self.filtering_private_rooms() {
          self.params.min_capacity = next_capacity(
            self.params.min_capacity,
            self.filters.max_private_room_capacity,
          );
          self.load_restaurants().await.ok();
        } else {
          self.status_msg = "Select private room: Yes (p) to filter by guests.".into();
        }
      }
      KeyCode::Char('x') => {
        self.params = SearchParams::default();
        self.load_restaurants().await.ok();
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let Some(name) = self.selected_name() else {
      self.screen = Screen::RestaurantList;
      return Ok(true);
    };

    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::RestaurantList;
        self.detail = None;
      }

      KeyCode::Down | KeyCode::Char('j') => {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      // Gallery
      KeyCode::Char('[') => {
        if let Some((_, len)) = self.gallery_position() {
          self.session.gallery(&name).prev(len);
        }
      }
      KeyCode::Char(']') => {
        if let Some((_, len)) = self.gallery_position() {
          self.session.gallery(&name).next(len);
        }
      }

      KeyCode::Char('r') => self.open_form(OpenForm::Review(name)),
      KeyCode::Char('m') => self.open_form(OpenForm::MenuUpload(name)),
      KeyCode::Char('p') => self.open_form(OpenForm::PhotoUpload(name)),

      _ => {}
    }
    Ok(true)
  }
}

/// Step through `options` and back to no constraint.
fn cycle(current: &Option<String>, options: &[String]) -> Option<String> {
  match current {
    None => options.first().cloned(),
    Some(v) => options
      .iter()
      .position(|o| o == v)
      .and_then(|i| options.get(i + 1))
      .cloned(),
  }
}

fn next_rating(current: Option<f64>) -> Option<f64> {
  let current = current.unwrap_or(0.0);
  RATING_STEPS
    .iter()
    .copied()
    .find(|step| *step > current)
}

/// Step the guest floor 1, 5, 10, ... up to `max`, then back to unset.
fn next_capacity(current: Option<u32>, max: Option<u32>) -> Option<u32> {
  let max = max?;
  match current {
    None => Some(1.min(max)),
    Some(c) if c >= max => None,
    Some(c) => Some(((c / CAPACITY_STEP + 1) * CAPACITY_STEP).min(max)),
  }
}
