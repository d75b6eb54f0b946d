pub mod config;
pub mod goal;
pub mod log;
pub mod progress;
pub mod timer;

use chrono::{Local, NaiveDate};
use std::path::Path;
use std::sync::Arc;
use timekeep_core::{Config, SqliteStore, StorageError};
use tracing::debug;

/// Open the configured database. One handle backs every service.
pub fn open_store(config: &Config) -> Result<Arc<SqliteStore>, StorageError> {
    let store = SqliteStore::open_default(Some(Path::new(&config.storage.database_file)))?;
    debug!(path = ?store.path(), "database opened");
    Ok(Arc::new(store))
}

pub fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
