//! SQL schema for the Makan SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// Table order is insertion order, read back with `ORDER BY rowid`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS restaurants (
    name          TEXT PRIMARY KEY,
    cuisine       TEXT NOT NULL,
    location      TEXT NOT NULL,
    rating        REAL NOT NULL,
    price_range   TEXT NOT NULL,   -- '$' .. '$$$$'
    description   TEXT NOT NULL,
    image         TEXT NOT NULL,
    address       TEXT NOT NULL,
    private_room  TEXT NOT NULL DEFAULT 'No',
    max_capacity  INTEGER           -- NULL unless private_room = 'Yes'
);

-- Reviews are append-only; restaurant_name is not a foreign key.
CREATE TABLE IF NOT EXISTS reviews (
    review_id            TEXT PRIMARY KEY,
    restaurant_name      TEXT NOT NULL,
    rating               REAL NOT NULL,
    review_text          TEXT NOT NULL,
    reviewer_name        TEXT NOT NULL,
    reviewer_department  TEXT NOT NULL DEFAULT '',
    reviewer_designation TEXT NOT NULL DEFAULT '',
    timestamp            TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

-- Menus and gallery images share one append-only table.
CREATE TABLE IF NOT EXISTS assets (
    asset_id        TEXT PRIMARY KEY,
    kind            TEXT NOT NULL,    -- 'menu' | 'gallery'
    restaurant_name TEXT NOT NULL,
    file_name       TEXT NOT NULL,
    file_type       TEXT NOT NULL,
    base64_data     TEXT NOT NULL,
    timestamp       TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS reviews_restaurant_idx ON reviews(restaurant_name);
CREATE INDEX IF NOT EXISTS assets_restaurant_idx  ON assets(kind, restaurant_name);

PRAGMA user_version = 1;
";
