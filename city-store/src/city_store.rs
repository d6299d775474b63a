//! City store: coordinate lookup and user/city association bookkeeping.
//!
//! Reference data lives in `cities(id, city, lat, lng)` and is populated out-of-band (see
//! [`CityStore::seed_from_json`]); chat commands only append to `users_cities(user_id, city_id)`.
//! Each operation acquires its own pooled connection and releases it when the call returns;
//! no transaction spans two operations.

use std::path::Path;

use async_trait::async_trait;
use citymap_core::{CityLookup, Coordinates, DbotError};
use tracing::{debug, info, instrument};

use crate::error::StorageError;
use crate::models::CitySeed;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct CityStore {
    pool_manager: SqlitePoolManager,
}

impl CityStore {
    /// Opens (or creates) the database at `database_url` and makes sure both tables exist.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cities (
                id INTEGER PRIMARY KEY,
                city TEXT NOT NULL,
                lat REAL NOT NULL,
                lng REAL NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users_cities (
                user_id INTEGER,
                city_id INTEGER,
                FOREIGN KEY(city_id) REFERENCES cities(id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_cities_user_id ON users_cities(user_id)")
            .execute(pool)
            .await?;

        info!("City tables ready");
        Ok(())
    }

    /// Exact, case-sensitive match on the city name. `None` when no row matches.
    #[instrument(skip(self))]
    pub async fn lookup_coordinates(
        &self,
        city_name: &str,
    ) -> Result<Option<Coordinates>, StorageError> {
        let row: Option<(f64, f64)> = sqlx::query_as(
            "SELECT CAST(lat AS REAL), CAST(lng AS REAL) FROM cities WHERE city = ? LIMIT 1",
        )
        .bind(city_name)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        debug!(city = %city_name, found = row.is_some(), "Coordinate lookup");
        Ok(row.map(|(lat, lng)| Coordinates::new(lat, lng)))
    }

    /// Links `user_id` to a known city. Returns false, without writing, when the city is unknown.
    ///
    /// Not idempotent: calling twice stores two rows.
    #[instrument(skip(self))]
    pub async fn add_association(
        &self,
        user_id: i64,
        city_name: &str,
    ) -> Result<bool, StorageError> {
        let mut conn = self.pool_manager.pool().acquire().await?;

        let city_id: Option<i64> = sqlx::query_scalar("SELECT id FROM cities WHERE city = ? LIMIT 1")
            .bind(city_name)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(city_id) = city_id else {
            debug!(user_id, city = %city_name, "Association rejected, unknown city");
            return Ok(false);
        };

        sqlx::query("INSERT INTO users_cities (user_id, city_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(city_id)
            .execute(&mut *conn)
            .await?;

        info!(user_id, city_id, city = %city_name, "Saved user city");
        Ok(true)
    }

    /// All city names saved by the user, in the order they were saved; duplicates kept.
    #[instrument(skip(self))]
    pub async fn list_cities(&self, user_id: i64) -> Result<Vec<String>, StorageError> {
        let cities: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT cities.city
            FROM users_cities
            JOIN cities ON users_cities.city_id = cities.id
            WHERE users_cities.user_id = ?
            ORDER BY users_cities.rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        Ok(cities)
    }

    /// Adds one reference row and returns its id. Used by seeding, never by chat commands.
    pub async fn insert_city(&self, city: &str, lat: f64, lng: f64) -> Result<i64, StorageError> {
        let result = sqlx::query("INSERT INTO cities (city, lat, lng) VALUES (?, ?, ?)")
            .bind(city)
            .bind(lat)
            .bind(lng)
            .execute(self.pool_manager.pool())
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Loads a JSON array of [`CitySeed`] records into `cities` inside one transaction.
    /// Names already present are skipped so re-running a seed keeps one row per city.
    /// Returns the number of rows inserted.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn seed_from_json(&self, path: impl AsRef<Path>) -> Result<usize, StorageError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let seeds: Vec<CitySeed> = serde_json::from_str(&raw)?;

        let mut tx = self.pool_manager.pool().begin().await?;
        let mut inserted = 0;

        for seed in &seeds {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM cities WHERE city = ? LIMIT 1")
                .bind(&seed.city)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_some() {
                continue;
            }

            sqlx::query("INSERT INTO cities (city, lat, lng) VALUES (?, ?, ?)")
                .bind(&seed.city)
                .bind(seed.lat)
                .bind(seed.lng)
                .execute(&mut *tx)
                .await?;
            inserted += 1;
        }

        tx.commit().await?;

        info!(total = seeds.len(), inserted, "Seeded cities");
        Ok(inserted)
    }
}

#[async_trait]
impl CityLookup for CityStore {
    async fn lookup_coordinates(
        &self,
        city_name: &str,
    ) -> citymap_core::Result<Option<Coordinates>> {
        CityStore::lookup_coordinates(self, city_name)
            .await
            .map_err(|e| DbotError::Database(e.to_string()))
    }
}
