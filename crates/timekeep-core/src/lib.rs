//! # Timekeep Core Library
//!
//! Business logic for a personal time-tracking tool: daily goals with
//! completion tracking, hourly activity notes, and focus/break countdowns.
//! The `timekeep` CLI is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Goal Store**: validated CRUD and filtered queries over daily goals,
//!   writing through to a [`GoalAdapter`]
//! - **Countdown Session**: a focus-then-break state machine driven by a
//!   background tokio task that streams one tick per second and can be
//!   cancelled at any tick boundary
//! - **Storage**: SQLite and in-memory adapters, TOML configuration
//!
//! Storage handles are passed explicitly. Share one adapter between services
//! by wrapping it in an `Arc`:
//!
//! ```ignore
//! let db = Arc::new(SqliteStore::open_default(None)?);
//! let goals = GoalStore::new(Arc::clone(&db));
//! let log = HourlyLog::new(db);
//! ```

pub mod error;
pub mod goal;
pub mod hourly_log;
pub mod logging;
pub mod progress;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, ErrorKind, StorageError, ValidationError};
pub use goal::{DailyCounts, Goal, GoalDraft, GoalFilter, GoalId, GoalStore, Priority, Recurrence};
pub use hourly_log::{HourlyLog, LogEntry};
pub use progress::ProgressSummary;
pub use storage::{Config, GoalAdapter, LogAdapter, MemoryStore, SqliteStore};
pub use timer::{Countdown, CountdownSession, Durations, Phase, Preset, Tick, TickStream};
