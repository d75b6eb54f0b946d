//! SQLite-backed persistence adapter.
//!
//! Provides persistent storage for:
//! - Daily goals (`daily_goals`)
//! - Hourly log entries (`hourly_logs`)
//!
//! The connection lives behind a mutex so one handle can be shared across
//! threads; each call is a single statement, committed before it returns.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{data_dir, migrations, GoalAdapter, LogAdapter};
use crate::error::StorageError;
use crate::goal::{hhmm, Goal, GoalFields, GoalFilter, GoalId, NewGoal};
use crate::hourly_log::{LogEntry, NewLogEntry};

const DATE_FORMAT: &str = "%Y-%m-%d";

const GOAL_SELECT_SQL: &str = "SELECT
    id, date, goal, hours, start_time, priority, recurrence, completed
FROM daily_goals";

/// Default database file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "time_manager.db";

pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply migrations.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        Self::from_connection(conn, Some(path))
    }

    /// Open `file_name` (or [`DEFAULT_DB_FILE`]) inside the data directory.
    pub fn open_default(file_name: Option<&Path>) -> Result<Self, StorageError> {
        let dir = data_dir()?;
        let file = file_name.unwrap_or_else(|| Path::new(DEFAULT_DB_FILE));
        Self::open(dir.join(file))
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::from_connection(conn, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self, StorageError> {
        migrations::migrate(&conn).map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Location on disk, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Raw `daily_goals` row before decoding.
struct GoalRow {
    id: i64,
    date: Option<String>,
    description: Option<String>,
    hours: Option<i64>,
    start_time: Option<String>,
    priority: String,
    recurrence: String,
    completed: Option<bool>,
}

impl GoalRow {
    fn read(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            description: row.get(2)?,
            hours: row.get(3)?,
            start_time: row.get(4)?,
            priority: row.get(5)?,
            recurrence: row.get(6)?,
            completed: row.get(7)?,
        })
    }

    fn decode(self) -> Result<Goal, StorageError> {
        let id = self.id;
        let corrupt = |message: String| StorageError::CorruptRecord { id, message };

        let date = self.date.unwrap_or_default();
        let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|e| corrupt(format!("date '{date}': {e}")))?;
        let hours = self
            .hours
            .and_then(|h| u8::try_from(h).ok())
            .ok_or_else(|| corrupt(format!("hours {:?}", self.hours)))?;
        let start_time = self.start_time.unwrap_or_default();
        let start_time = chrono::NaiveTime::parse_from_str(&start_time, hhmm::FORMAT)
            .map_err(|e| corrupt(format!("start_time '{start_time}': {e}")))?;

        Ok(Goal {
            id,
            date,
            description: self.description.unwrap_or_default(),
            hours,
            start_time,
            priority: self.priority.parse().map_err(|e| corrupt(format!("{e}")))?,
            recurrence: self.recurrence.parse().map_err(|e| corrupt(format!("{e}")))?,
            completed: self.completed.unwrap_or(false),
        })
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn require_row(id: i64, changed: usize) -> Result<(), StorageError> {
    if changed == 0 {
        Err(StorageError::RecordNotFound(id))
    } else {
        Ok(())
    }
}

impl GoalAdapter for SqliteStore {
    fn insert(&self, goal: &NewGoal) -> Result<GoalId, StorageError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO daily_goals (date, goal, hours, start_time, priority, recurrence, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
            params![
                date_key(goal.date),
                goal.fields.description,
                goal.fields.hours,
                goal.fields.start_time.format(hhmm::FORMAT).to_string(),
                goal.fields.priority.as_str(),
                goal.recurrence.as_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn get(&self, id: GoalId) -> Result<Option<Goal>, StorageError> {
        let conn = self.conn();
        let row = conn
            .query_row(
                &format!("{GOAL_SELECT_SQL} WHERE id = ?1"),
                params![id],
                GoalRow::read,
            )
            .optional()?;
        row.map(GoalRow::decode).transpose()
    }

    fn update(&self, id: GoalId, fields: &GoalFields) -> Result<(), StorageError> {
        let changed = self.conn().execute(
            "UPDATE daily_goals
             SET goal = ?1, hours = ?2, start_time = ?3, priority = ?4
             WHERE id = ?5",
            params![
                fields.description,
                fields.hours,
                fields.start_time.format(hhmm::FORMAT).to_string(),
                fields.priority.as_str(),
                id,
            ],
        )?;
        require_row(id, changed)
    }

    fn set_completed(&self, id: GoalId, completed: bool) -> Result<(), StorageError> {
        // SQLite counts matched rows, so re-setting the same value still reports 1.
        let changed = self.conn().execute(
            "UPDATE daily_goals SET completed = ?1 WHERE id = ?2",
            params![completed, id],
        )?;
        require_row(id, changed)
    }

    fn delete(&self, id: GoalId) -> Result<(), StorageError> {
        let changed = self
            .conn()
            .execute("DELETE FROM daily_goals WHERE id = ?1", params![id])?;
        require_row(id, changed)
    }

    fn query_by_date_and_completion(
        &self,
        date: NaiveDate,
        filter: GoalFilter,
    ) -> Result<Vec<Goal>, StorageError> {
        let clause = match filter {
            GoalFilter::All => "",
            GoalFilter::Completed => " AND completed = 1",
            GoalFilter::NotCompleted => " AND COALESCE(completed, 0) = 0",
        };
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{GOAL_SELECT_SQL} WHERE date = ?1{clause} ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map(params![date_key(date)], GoalRow::read)?;

        let mut goals = Vec::new();
        for row in rows {
            goals.push(row?.decode()?);
        }
        Ok(goals)
    }

    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM daily_goals WHERE date = ?1",
            params![date_key(date)],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }

    fn count_by_date_and_completed(&self, date: NaiveDate) -> Result<u32, StorageError> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM daily_goals WHERE date = ?1 AND completed = 1",
            params![date_key(date)],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }
}

fn decode_log(row: &Row) -> Result<(i64, String, Option<String>, Option<String>), rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn log_entry(
    (id, date, hour, text): (i64, String, Option<String>, Option<String>),
) -> Result<LogEntry, StorageError> {
    let corrupt = |message: String| StorageError::CorruptRecord { id, message };
    let date = if date.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|e| corrupt(format!("date '{date}': {e}")))?,
        )
    };
    let hour = hour.unwrap_or_default();
    let hour = hour
        .split(':')
        .next()
        .and_then(|h| h.trim().parse::<u8>().ok())
        .filter(|h| *h < 24)
        .ok_or_else(|| corrupt(format!("hour '{hour}'")))?;
    Ok(LogEntry {
        id,
        date,
        hour,
        text: text.unwrap_or_default(),
    })
}

impl LogAdapter for SqliteStore {
    fn append(&self, entry: &NewLogEntry) -> Result<i64, StorageError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO hourly_logs (date, hour, log) VALUES (?1, ?2, ?3)",
            params![date_key(entry.date), format!("{}:00", entry.hour), entry.text],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<LogEntry>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, date, hour, log FROM hourly_logs WHERE date = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![date_key(date)], decode_log)?;
        let entries = rows.map(|row| log_entry(row?)).collect();
        entries
    }

    fn list_all(&self) -> Result<Vec<LogEntry>, StorageError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, date, hour, log FROM hourly_logs ORDER BY id ASC")?;
        let rows = stmt.query_map([], decode_log)?;
        let entries = rows.map(|row| log_entry(row?)).collect();
        entries
    }

    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM hourly_logs WHERE date = ?1",
            params![date_key(date)],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{GoalDraft, Priority, Recurrence};

    fn new_goal(description: &str, date: NaiveDate) -> NewGoal {
        NewGoal {
            date,
            fields: GoalDraft::new(description, 2, "09:30")
                .with_priority(Priority::High)
                .validate()
                .unwrap(),
            recurrence: Recurrence::Monthly,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn insert_and_get() {
        let db = SqliteStore::open_memory().unwrap();
        let id = db.insert(&new_goal("Plan sprint", day(1))).unwrap();
        let goal = db.get(id).unwrap().unwrap();
        assert_eq!(goal.description, "Plan sprint");
        assert_eq!(goal.start_time_hhmm(), "09:30");
        assert_eq!(goal.priority, Priority::High);
        assert_eq!(goal.recurrence, Recurrence::Monthly);
        assert!(!goal.completed);
        assert!(db.get(id + 1).unwrap().is_none());
    }

    #[test]
    fn missing_rows_report_not_found() {
        let db = SqliteStore::open_memory().unwrap();
        let fields = GoalDraft::new("x", 1, "10:00").validate().unwrap();
        assert!(matches!(db.update(9, &fields), Err(StorageError::RecordNotFound(9))));
        assert!(matches!(db.set_completed(9, true), Err(StorageError::RecordNotFound(9))));
        assert!(matches!(db.delete(9), Err(StorageError::RecordNotFound(9))));
    }

    #[test]
    fn set_completed_is_idempotent() {
        let db = SqliteStore::open_memory().unwrap();
        let id = db.insert(&new_goal("Stretch", day(1))).unwrap();
        db.set_completed(id, true).unwrap();
        db.set_completed(id, true).unwrap();
        assert!(db.get(id).unwrap().unwrap().completed);
    }

    #[test]
    fn query_filters_by_exact_date_and_completion() {
        let db = SqliteStore::open_memory().unwrap();
        let a = db.insert(&new_goal("a", day(1))).unwrap();
        let b = db.insert(&new_goal("b", day(1))).unwrap();
        db.insert(&new_goal("other day", day(2))).unwrap();
        db.set_completed(b, true).unwrap();

        let ids = |filter| {
            db.query_by_date_and_completion(day(1), filter)
                .unwrap()
                .into_iter()
                .map(|g| g.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(GoalFilter::All), vec![a, b]);
        assert_eq!(ids(GoalFilter::Completed), vec![b]);
        assert_eq!(ids(GoalFilter::NotCompleted), vec![a]);
        assert_eq!(GoalAdapter::count_by_date(&db, day(1)).unwrap(), 2);
        assert_eq!(db.count_by_date_and_completed(day(1)).unwrap(), 1);
    }

    #[test]
    fn corrupt_rows_are_reported() {
        let db = SqliteStore::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO daily_goals (date, goal, hours, start_time, priority, recurrence)
                 VALUES ('2024-06-01', 'bad', 3, '09:00', 'urgent', 'none')",
                [],
            )
            .unwrap();
        let err = db
            .query_by_date_and_completion(day(1), GoalFilter::All)
            .unwrap_err();
        assert!(matches!(err, StorageError::CorruptRecord { .. }));
    }

    #[test]
    fn log_entries_round_trip_with_legacy_rows() {
        let db = SqliteStore::open_memory().unwrap();
        db.conn()
            .execute("INSERT INTO hourly_logs (hour, log) VALUES ('7:00', 'legacy')", [])
            .unwrap();
        db.append(&NewLogEntry {
            date: day(3),
            hour: 14,
            text: "Code review".into(),
        })
        .unwrap();

        let today = db.list_by_date(day(3)).unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].hour, 14);
        assert_eq!(LogAdapter::count_by_date(&db, day(3)).unwrap(), 1);

        let all = db.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].date, None);
        assert_eq!(all[0].hour, 7);
    }

    #[test]
    fn reopening_a_file_keeps_goals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("goals.db");
        let id = {
            let db = SqliteStore::open(&path).unwrap();
            db.insert(&new_goal("Persist me", day(5))).unwrap()
        };
        let db = SqliteStore::open(&path).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        assert_eq!(db.get(id).unwrap().unwrap().description, "Persist me");
    }
}
