//! Free-text notes of what was done in a given hour. Append and list only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, ValidationError};
use crate::storage::LogAdapter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    /// `None` for entries recorded before dates were tracked.
    pub date: Option<NaiveDate>,
    pub hour: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogEntry {
    pub date: NaiveDate,
    pub hour: u8,
    pub text: String,
}

pub struct HourlyLog<A> {
    adapter: A,
}

impl<A: LogAdapter> HourlyLog<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// # Errors
    /// `InvalidInput` if `hour` is not in `0..=23` or `text` is blank.
    pub fn record(&self, date: NaiveDate, hour: i64, text: &str) -> Result<LogEntry> {
        let hour = u8::try_from(hour)
            .ok()
            .filter(|h| *h < 24)
            .ok_or(ValidationError::OutOfRange {
                field: "hour",
                value: hour,
                min: 0,
                max: 23,
            })?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty("text").into());
        }

        let entry = NewLogEntry {
            date,
            hour,
            text: text.to_string(),
        };
        let id = self.adapter.append(&entry)?;
        info!(entry_id = id, %date, hour, "hour logged");
        Ok(LogEntry {
            id,
            date: Some(date),
            hour,
            text: entry.text,
        })
    }

    pub fn entries_for(&self, date: NaiveDate) -> Result<Vec<LogEntry>> {
        Ok(self.adapter.list_by_date(date)?)
    }

    pub fn all_entries(&self) -> Result<Vec<LogEntry>> {
        Ok(self.adapter.list_all()?)
    }

    pub fn hours_logged(&self, date: NaiveDate) -> Result<u32> {
        Ok(self.adapter.count_by_date(date)?)
    }
}
