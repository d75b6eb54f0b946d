mod config;
pub mod database;
pub mod memory;
pub mod migrations;

pub use config::{Config, LoggingConfig, StorageConfig, TimerConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StorageError;
use crate::goal::{Goal, GoalFields, GoalFilter, GoalId, NewGoal};
use crate::hourly_log::{LogEntry, NewLogEntry};

/// Durable storage for goal records.
///
/// Implementations report a missing identifier as
/// [`StorageError::RecordNotFound`] and return query results ordered by id.
pub trait GoalAdapter: Send + Sync {
    fn insert(&self, goal: &NewGoal) -> Result<GoalId, StorageError>;
    fn get(&self, id: GoalId) -> Result<Option<Goal>, StorageError>;
    fn update(&self, id: GoalId, fields: &GoalFields) -> Result<(), StorageError>;
    fn set_completed(&self, id: GoalId, completed: bool) -> Result<(), StorageError>;
    fn delete(&self, id: GoalId) -> Result<(), StorageError>;
    fn query_by_date_and_completion(
        &self,
        date: NaiveDate,
        filter: GoalFilter,
    ) -> Result<Vec<Goal>, StorageError>;
    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError>;
    fn count_by_date_and_completed(&self, date: NaiveDate) -> Result<u32, StorageError>;
}

/// Append-only storage for hourly log entries.
pub trait LogAdapter: Send + Sync {
    fn append(&self, entry: &NewLogEntry) -> Result<i64, StorageError>;
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<LogEntry>, StorageError>;
    fn list_all(&self) -> Result<Vec<LogEntry>, StorageError>;
    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError>;
}

// A composer holds one `Arc` handle and passes clones to each service.
impl<T: GoalAdapter + ?Sized> GoalAdapter for Arc<T> {
    fn insert(&self, goal: &NewGoal) -> Result<GoalId, StorageError> {
        (**self).insert(goal)
    }
    fn get(&self, id: GoalId) -> Result<Option<Goal>, StorageError> {
        (**self).get(id)
    }
    fn update(&self, id: GoalId, fields: &GoalFields) -> Result<(), StorageError> {
        (**self).update(id, fields)
    }
    fn set_completed(&self, id: GoalId, completed: bool) -> Result<(), StorageError> {
        (**self).set_completed(id, completed)
    }
    fn delete(&self, id: GoalId) -> Result<(), StorageError> {
        (**self).delete(id)
    }
    fn query_by_date_and_completion(
        &self,
        date: NaiveDate,
        filter: GoalFilter,
    ) -> Result<Vec<Goal>, StorageError> {
        (**self).query_by_date_and_completion(date, filter)
    }
    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError> {
        (**self).count_by_date(date)
    }
    fn count_by_date_and_completed(&self, date: NaiveDate) -> Result<u32, StorageError> {
        (**self).count_by_date_and_completed(date)
    }
}

impl<T: LogAdapter + ?Sized> LogAdapter for Arc<T> {
    fn append(&self, entry: &NewLogEntry) -> Result<i64, StorageError> {
        (**self).append(entry)
    }
    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<LogEntry>, StorageError> {
        (**self).list_by_date(date)
    }
    fn list_all(&self) -> Result<Vec<LogEntry>, StorageError> {
        (**self).list_all()
    }
    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError> {
        (**self).count_by_date(date)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `TIMEKEEP_DATA_DIR` wins when set. Otherwise `~/.config/timekeep[-dev]/`,
/// where the `-dev` suffix is selected by `TIMEKEEP_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("TIMEKEEP_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("TIMEKEEP_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("timekeep-dev")
            } else {
                base_dir.join("timekeep")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| {
        std::io::Error::new(e.kind(), format!("cannot create {}: {e}", dir.display()))
    })?;
    Ok(dir)
}
