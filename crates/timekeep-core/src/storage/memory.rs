//! In-memory persistence adapter for tests and ephemeral sessions.
//!
//! Identifiers increase monotonically and are never reused after a delete.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{GoalAdapter, LogAdapter};
use crate::error::StorageError;
use crate::goal::{Goal, GoalFields, GoalFilter, GoalId, NewGoal};
use crate::hourly_log::{LogEntry, NewLogEntry};

#[derive(Default)]
struct Tables {
    goals: BTreeMap<GoalId, Goal>,
    logs: Vec<LogEntry>,
    last_goal_id: GoalId,
    last_log_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_goal<T>(
        &self,
        id: GoalId,
        f: impl FnOnce(&mut Goal) -> T,
    ) -> Result<T, StorageError> {
        let mut tables = self.tables();
        let goal = tables
            .goals
            .get_mut(&id)
            .ok_or(StorageError::RecordNotFound(id))?;
        Ok(f(goal))
    }
}

impl GoalAdapter for MemoryStore {
    fn insert(&self, goal: &NewGoal) -> Result<GoalId, StorageError> {
        let mut tables = self.tables();
        tables.last_goal_id += 1;
        let id = tables.last_goal_id;
        tables.goals.insert(id, Goal::from_new(id, goal.clone()));
        Ok(id)
    }

    fn get(&self, id: GoalId) -> Result<Option<Goal>, StorageError> {
        Ok(self.tables().goals.get(&id).cloned())
    }

    fn update(&self, id: GoalId, fields: &GoalFields) -> Result<(), StorageError> {
        self.with_goal(id, |goal| goal.apply(fields))
    }

    fn set_completed(&self, id: GoalId, completed: bool) -> Result<(), StorageError> {
        self.with_goal(id, |goal| goal.completed = completed)
    }

    fn delete(&self, id: GoalId) -> Result<(), StorageError> {
        self.tables()
            .goals
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::RecordNotFound(id))
    }

    fn query_by_date_and_completion(
        &self,
        date: NaiveDate,
        filter: GoalFilter,
    ) -> Result<Vec<Goal>, StorageError> {
        Ok(self
            .tables()
            .goals
            .values()
            .filter(|g| g.date == date && filter.matches(g.completed))
            .cloned()
            .collect())
    }

    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError> {
        Ok(self.tables().goals.values().filter(|g| g.date == date).count() as u32)
    }

    fn count_by_date_and_completed(&self, date: NaiveDate) -> Result<u32, StorageError> {
        Ok(self
            .tables()
            .goals
            .values()
            .filter(|g| g.date == date && g.completed)
            .count() as u32)
    }
}

impl LogAdapter for MemoryStore {
    fn append(&self, entry: &NewLogEntry) -> Result<i64, StorageError> {
        let mut tables = self.tables();
        tables.last_log_id += 1;
        let id = tables.last_log_id;
        tables.logs.push(LogEntry {
            id,
            date: Some(entry.date),
            hour: entry.hour,
            text: entry.text.clone(),
        });
        Ok(id)
    }

    fn list_by_date(&self, date: NaiveDate) -> Result<Vec<LogEntry>, StorageError> {
        Ok(self
            .tables()
            .logs
            .iter()
            .filter(|e| e.date == Some(date))
            .cloned()
            .collect())
    }

    fn list_all(&self) -> Result<Vec<LogEntry>, StorageError> {
        Ok(self.tables().logs.clone())
    }

    fn count_by_date(&self, date: NaiveDate) -> Result<u32, StorageError> {
        Ok(self
            .tables()
            .logs
            .iter()
            .filter(|e| e.date == Some(date))
            .count() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{GoalDraft, Recurrence};

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let new = NewGoal {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            fields: GoalDraft::new("a", 1, "08:00").validate().unwrap(),
            recurrence: Recurrence::None,
        };
        let first = store.insert(&new).unwrap();
        store.delete(first).unwrap();
        let second = store.insert(&new).unwrap();
        assert!(second > first);
        assert!(matches!(store.delete(first), Err(StorageError::RecordNotFound(_))));
    }
}
