//! Async HTTP client wrapping the makan JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use makan_core::{
  asset::{Asset, AssetKind, NewAsset},
  card::RestaurantCard,
  restaurant::{NewRestaurant, Restaurant},
  review::{NewReview, Review},
  search::FilterOptions,
  store::TableKind,
};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Connection settings for the makan server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Query string for `GET /api/restaurants`. Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchParams {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q:            Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cuisine:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub price_range:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_rating:   Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub private_room: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_capacity: Option<u32>,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

#[derive(Deserialize)]
struct Replaced {
  replaced: usize,
}

/// Async HTTP client for the makan server.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  base:   Url,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    let base = Url::parse(&config.base_url)
      .with_context(|| format!("invalid server URL {:?}", config.base_url))?;
    if base.cannot_be_a_base() {
      return Err(anyhow!("invalid server URL {:?}", config.base_url));
    }
    Ok(Self { client, base, config })
  }

  /// Join percent-encoded path segments onto the base URL. Restaurant names
  /// may contain spaces and slashes, so they are never formatted into a path
  /// string directly.
  fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn api<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
    self.url(std::iter::once("api").chain(segments))
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    self.client.request(method, url)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req`, turning a non-success status into an error that carries the
  /// server's `{"error": …}` message when there is one.
  async fn send(req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    match resp.json::<ErrorBody>().await {
      Ok(body) => Err(anyhow!("{what} → {status}: {}", body.error)),
      Err(_) => Err(anyhow!("{what} → {status}")),
    }
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
    Self::send(self.request(Method::GET, url), what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising response to {what}"))
  }

  async fn post_json<B, T>(&self, url: Url, body: &B, what: &str) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    Self::send(self.request(Method::POST, url).json(body), what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising response to {what}"))
  }

  // ── Restaurants ───────────────────────────────────────────────────────────

  /// `GET /api/restaurants?…`
  pub async fn search(&self, params: &SearchParams) -> Result<Vec<Restaurant>> {
    let req = self
      .request(Method::GET, self.api(["restaurants"]))
      .query(params);
    Self::send(req, "GET /restaurants")
      .await?
      .json()
      .await
      .context("deserialising restaurants")
  }

  /// `GET /api/restaurants/{name}`
  pub async fn restaurant(&self, name: &str) -> Result<Restaurant> {
    self
      .get_json(self.api(["restaurants", name]), "GET /restaurants/{name}")
      .await
  }

  /// `GET /api/restaurants/{name}/card`
  pub async fn card(&self, name: &str) -> Result<RestaurantCard> {
    self
      .get_json(
        self.api(["restaurants", name, "card"]),
        "GET /restaurants/{name}/card",
      )
      .await
  }

  /// `POST /api/restaurants`
  pub async fn add_restaurant(&self, input: &NewRestaurant) -> Result<Restaurant> {
    self
      .post_json(self.api(["restaurants"]), input, "POST /restaurants")
      .await
  }

  /// `GET /api/filters`
  pub async fn filters(&self) -> Result<FilterOptions> {
    self.get_json(self.api(["filters"]), "GET /filters").await
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  /// `GET /api/restaurants/{name}/reviews`, newest first.
  pub async fn reviews(&self, name: &str) -> Result<Vec<Review>> {
    self
      .get_json(
        self.api(["restaurants", name, "reviews"]),
        "GET /restaurants/{name}/reviews",
      )
      .await
  }

  /// `POST /api/restaurants/{name}/reviews`
  pub async fn add_review(&self, input: &NewReview) -> Result<Review> {
    self
      .post_json(
        self.api(["restaurants", &input.restaurant_name, "reviews"]),
        input,
        "POST /restaurants/{name}/reviews",
      )
      .await
  }

  // ── Assets ────────────────────────────────────────────────────────────────

  /// `GET /api/restaurants/{name}/{menus|gallery}`
  pub async fn assets(&self, kind: AssetKind, name: &str) -> Result<Vec<Asset>> {
    self
      .get_json(
        self.api(["restaurants", name, asset_segment(kind)]),
        "GET /restaurants/{name}/assets",
      )
      .await
  }

  /// `POST /api/restaurants/{name}/{menus|gallery}`
  pub async fn upload(&self, kind: AssetKind, input: &NewAsset) -> Result<Asset> {
    self
      .post_json(
        self.api(["restaurants", &input.restaurant_name, asset_segment(kind)]),
        input,
        "POST /restaurants/{name}/assets",
      )
      .await
  }

  // ── Server surface ────────────────────────────────────────────────────────

  /// `GET /export/{table}` as CSV text.
  pub async fn export(&self, table: TableKind) -> Result<String> {
    let url = self.url(["export", table.as_ref()]);
    Self::send(self.request(Method::GET, url), "GET /export/{table}")
      .await?
      .text()
      .await
      .context("reading export body")
  }

  /// `PUT /admin/restaurants` with a restaurant CSV; returns the new row count.
  pub async fn replace_restaurants(&self, csv: String) -> Result<usize> {
    let req = self
      .auth(self.request(Method::PUT, self.url(["admin", "restaurants"])))
      .header(reqwest::header::CONTENT_TYPE, "text/csv")
      .body(csv);
    let replaced: Replaced = Self::send(req, "PUT /admin/restaurants")
      .await?
      .json()
      .await
      .context("deserialising upload result")?;
    Ok(replaced.replaced)
  }
}

fn asset_segment(kind: AssetKind) -> &'static str {
  match kind {
    AssetKind::Menu => "menus",
    AssetKind::Gallery => "gallery",
  }
}
