//! City store crate: city coordinates and user/city associations in SQLite.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Seed records
//! - [`city_store`] – CityStore (lookup, associations, seeding)
//! - [`sqlite_pool`] – SqlitePoolManager

mod city_store;
mod error;
mod models;
mod sqlite_pool;

pub use city_store::CityStore;
pub use error::StorageError;
pub use models::CitySeed;
pub use sqlite_pool::SqlitePoolManager;
