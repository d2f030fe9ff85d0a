//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`].

use std::{collections::HashSet, path::Path, sync::Arc};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use makan_core::{
  asset::{Asset, AssetKind, NewAsset},
  restaurant::{NewRestaurant, Restaurant},
  review::{NewReview, Review, newest_first},
  store::DirectoryStore,
};

use crate::{
  Error, Result,
  cache::TableCache,
  encode::{
    ASSET_COLUMNS, RESTAURANT_COLUMNS, REVIEW_COLUMNS, RawAsset, RawRestaurant,
    RawReview, encode_asset_kind, encode_dt, encode_uuid, insert_restaurant,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Makan directory backed by a single SQLite file.
///
/// Cloning is cheap; the connection and the read cache are shared.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  cache: Arc<TableCache>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, cache: Arc::default() };
    store.init_schema().await?;
    info!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, cache: Arc::default() };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn load_restaurants(&self) -> Result<Vec<Restaurant>> {
    let raws: Vec<RawRestaurant> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawRestaurant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRestaurant::into_restaurant).collect()
  }

  async fn load_reviews(&self, restaurant: Option<String>) -> Result<Vec<Review>> {
    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(name) = restaurant {
          let mut stmt = conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews
             WHERE restaurant_name = ?1 ORDER BY rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![name], RawReview::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn
            .prepare(&format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY rowid"))?;
          stmt
            .query_map([], RawReview::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }

  async fn load_assets(
    &self,
    kind: AssetKind,
    restaurant: Option<String>,
  ) -> Result<Vec<Asset>> {
    let kind_str = encode_asset_kind(kind);

    let raws: Vec<RawAsset> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSET_COLUMNS} FROM assets
           WHERE kind = ?1 AND (?2 IS NULL OR restaurant_name = ?2)
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![kind_str, restaurant], RawAsset::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAsset::into_asset).collect()
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  // ── Restaurants ───────────────────────────────────────────────────────────

  async fn restaurants(&self) -> Result<Vec<Restaurant>> {
    let generation = match self.cache.restaurants.get() {
      Ok(rows) => return Ok((*rows).clone()),
      Err(generation) => generation,
    };
    let rows = self.load_restaurants().await?;
    debug!(count = rows.len(), "cached restaurant table");
    Ok(self.cache.restaurants.fill(generation, rows).to_vec())
  }

  async fn get_restaurant(&self, name: &str) -> Result<Option<Restaurant>> {
    let name = name.to_owned();

    let raw: Option<RawRestaurant> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE name = ?1"),
              rusqlite::params![name],
              RawRestaurant::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRestaurant::into_restaurant).transpose()
  }

  async fn add_restaurant(&self, input: NewRestaurant) -> Result<Restaurant> {
    let restaurant = input.validate()?;

    let row = restaurant.clone();
    let inserted = self
      .conn
      .call(move |conn| Ok(insert_restaurant(conn, &row)?))
      .await?;

    if inserted == 0 {
      return Err(Error::DuplicateRestaurant(restaurant.name));
    }

    self.cache.restaurants.invalidate();
    info!(name = %restaurant.name, "added restaurant");
    Ok(restaurant)
  }

  async fn replace_restaurants(&self, restaurants: Vec<Restaurant>) -> Result<usize> {
    let mut seen = HashSet::new();
    if let Some(dup) = restaurants.iter().find(|r| !seen.insert(r.name.as_str())) {
      return Err(Error::DuplicateRestaurant(dup.name.clone()));
    }

    let count = restaurants.len();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM restaurants", [])?;
        for r in &restaurants {
          insert_restaurant(&tx, r)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    self.cache.restaurants.invalidate();
    info!(count, "replaced restaurant table");
    Ok(count)
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn reviews(&self) -> Result<Vec<Review>> {
    let generation = match self.cache.reviews.get() {
      Ok(rows) => return Ok((*rows).clone()),
      Err(generation) => generation,
    };
    let rows = self.load_reviews(None).await?;
    debug!(count = rows.len(), "cached review table");
    Ok(self.cache.reviews.fill(generation, rows).to_vec())
  }

  async fn reviews_for(&self, restaurant: &str) -> Result<Vec<Review>> {
    let mut reviews = self.load_reviews(Some(restaurant.to_owned())).await?;
    newest_first(&mut reviews);
    Ok(reviews)
  }

  async fn add_review(&self, input: NewReview) -> Result<Review> {
    let review = input.validate(Utc::now())?;

    let id_str = encode_uuid(review.review_id);
    let at_str = encode_dt(review.timestamp);
    let row = review.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO reviews ({REVIEW_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
          ),
          rusqlite::params![
            id_str,
            row.restaurant_name,
            row.rating,
            row.review_text,
            row.reviewer_name,
            row.reviewer_department,
            row.reviewer_designation,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    self.cache.reviews.invalidate();
    info!(restaurant = %review.restaurant_name, rating = review.rating, "added review");
    Ok(review)
  }

  // ── Assets ────────────────────────────────────────────────────────────────

  async fn assets(&self, kind: AssetKind) -> Result<Vec<Asset>> {
    self.load_assets(kind, None).await
  }

  async fn assets_for(&self, kind: AssetKind, restaurant: &str) -> Result<Vec<Asset>> {
    self.load_assets(kind, Some(restaurant.to_owned())).await
  }

  async fn add_asset(&self, kind: AssetKind, input: NewAsset) -> Result<Asset> {
    let asset = input.validate(kind, Utc::now())?;

    let id_str = encode_uuid(asset.asset_id);
    let kind_str = encode_asset_kind(kind);
    let at_str = encode_dt(asset.timestamp);
    let row = asset.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!("INSERT INTO assets ({ASSET_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
          rusqlite::params![
            id_str,
            kind_str,
            row.restaurant_name,
            row.file_name,
            row.file_type,
            row.base64_data,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    info!(
      kind = %kind,
      restaurant = %asset.restaurant_name,
      file = %asset.file_name,
      "added asset"
    );
    Ok(asset)
  }
}
