//! Database schema migrations for timekeep.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.
//!
//! v1 is the two-table layout of earlier `time_manager.db` files, so those
//! databases open and upgrade in place.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{debug, warn};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }
    if current_version < SCHEMA_VERSION {
        debug!(from = current_version, to = SCHEMA_VERSION, "schema migrated");
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Returns 0 if no version is set (fresh or legacy database).
pub(crate) fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: baseline goal and log tables.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS hourly_logs (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            hour TEXT,
            log  TEXT
        );

        CREATE TABLE IF NOT EXISTS daily_goals (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            date       TEXT,
            goal       TEXT,
            hours      INTEGER,
            start_time TEXT,
            completed  BOOLEAN DEFAULT 0
        );",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: goal priority and recurrence.
///
/// Existing goals become `medium` / `none`.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "ALTER TABLE daily_goals ADD COLUMN priority TEXT NOT NULL DEFAULT 'medium';
         ALTER TABLE daily_goals ADD COLUMN recurrence TEXT NOT NULL DEFAULT 'none';
         UPDATE daily_goals SET completed = 0 WHERE completed IS NULL;
         CREATE INDEX IF NOT EXISTS idx_daily_goals_date_completed
             ON daily_goals(date, completed);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: hourly log entries carry their calendar date.
///
/// Legacy rows only stored `H:00`; they keep an empty date and show up in
/// full listings but never in per-day queries.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "ALTER TABLE hourly_logs ADD COLUMN date TEXT NOT NULL DEFAULT '';
         CREATE INDEX IF NOT EXISTS idx_hourly_logs_date ON hourly_logs(date);",
    )?;
    set_schema_version(&tx, 3)?;
    tx.commit()
}
