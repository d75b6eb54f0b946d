//! Goal Store: validated CRUD and queries over daily goals.
//!
//! Every mutation is written through to the [`GoalAdapter`] before the call
//! returns. All operations run under one store-level lock, so a caller always
//! reads its own writes and [`GoalStore::daily_counts`] never observes a
//! half-applied mutation.
//!
//! Query results are ordered by identifier ascending (insertion order).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::{Goal, GoalDraft, GoalFilter, GoalId, NewGoal, Recurrence};
use crate::error::{CoreError, Result, StorageError};
use crate::storage::GoalAdapter;

/// Progress counts for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyCounts {
    pub total: u32,
    pub completed: u32,
}

impl DailyCounts {
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.completed)
    }
}

pub struct GoalStore<A> {
    adapter: A,
    lock: Mutex<()>,
}

impl<A: GoalAdapter> GoalStore<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            lock: Mutex::new(()),
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Create a goal for `date`. New goals always start incomplete.
    ///
    /// # Errors
    /// `InvalidInput` for any malformed field, `StorageFailure` if the insert
    /// fails.
    pub fn add_goal(
        &self,
        date: NaiveDate,
        draft: &GoalDraft,
        recurrence: Recurrence,
    ) -> Result<Goal> {
        let fields = draft.validate()?;
        let new = NewGoal {
            date,
            fields,
            recurrence,
        };

        let _guard = self.guard();
        let id = self.adapter.insert(&new).inspect_err(|e| {
            warn!(%date, error = %e, "goal insert failed");
        })?;
        info!(goal_id = id, %date, "goal added");
        Ok(Goal::from_new(id, new))
    }

    /// Replace the editable fields of an existing goal. `date`, `recurrence`
    /// and `completed` are left untouched.
    ///
    /// # Errors
    /// `NotFound` if `id` does not exist, checked before the fields are
    /// validated, then `InvalidInput` for any malformed field.
    pub fn edit_goal(&self, id: GoalId, draft: &GoalDraft) -> Result<Goal> {
        let _guard = self.guard();
        self.fetch(id)?;
        let fields = draft.validate()?;
        self.adapter
            .update(id, &fields)
            .map_err(|e| not_found_as(id, e))?;
        let goal = self.fetch(id)?;
        info!(goal_id = id, "goal edited");
        Ok(goal)
    }

    /// Set the completion flag. Setting the value it already has succeeds.
    pub fn toggle_complete(&self, id: GoalId, completed: bool) -> Result<()> {
        let _guard = self.guard();
        self.adapter
            .set_completed(id, completed)
            .map_err(|e| not_found_as(id, e))?;
        info!(goal_id = id, completed, "goal completion set");
        Ok(())
    }

    /// Permanently remove a goal.
    pub fn delete_goal(&self, id: GoalId) -> Result<()> {
        let _guard = self.guard();
        self.adapter.delete(id).map_err(|e| not_found_as(id, e))?;
        info!(goal_id = id, "goal deleted");
        Ok(())
    }

    /// Goals for exactly `date`, filtered by completion, ordered by id.
    pub fn query_goals(&self, date: NaiveDate, filter: GoalFilter) -> Result<Vec<Goal>> {
        let _guard = self.guard();
        let goals = self.adapter.query_by_date_and_completion(date, filter)?;
        debug!(%date, ?filter, count = goals.len(), "goals queried");
        Ok(goals)
    }

    /// Total and completed counts for `date`, read atomically.
    pub fn daily_counts(&self, date: NaiveDate) -> Result<DailyCounts> {
        let _guard = self.guard();
        let total = self.adapter.count_by_date(date)?;
        let completed = self.adapter.count_by_date_and_completed(date)?;
        Ok(DailyCounts { total, completed })
    }

    pub fn get(&self, id: GoalId) -> Result<Goal> {
        let _guard = self.guard();
        self.fetch(id)
    }

    fn fetch(&self, id: GoalId) -> Result<Goal> {
        self.adapter.get(id)?.ok_or(CoreError::NotFound(id))
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn not_found_as(id: GoalId, err: StorageError) -> CoreError {
    match err {
        StorageError::RecordNotFound(_) => CoreError::NotFound(id),
        other => CoreError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::goal::Priority;
    use crate::storage::MemoryStore;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    fn store() -> GoalStore<MemoryStore> {
        GoalStore::new(MemoryStore::new())
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let store = store();
        let a = store
            .add_goal(day(), &GoalDraft::new("A", 1, "08:00"), Recurrence::None)
            .unwrap();
        let b = store
            .add_goal(day(), &GoalDraft::new("B", 2, "07:00"), Recurrence::Daily)
            .unwrap();
        assert!(b.id > a.id);
        assert!(!a.completed);
        assert_eq!(b.recurrence, Recurrence::Daily);
    }

    #[test]
    fn edit_keeps_date_recurrence_and_completion() {
        let store = store();
        let goal = store
            .add_goal(day(), &GoalDraft::new("Run", 1, "06:00"), Recurrence::Weekly)
            .unwrap();
        store.toggle_complete(goal.id, true).unwrap();

        let edited = store
            .edit_goal(
                goal.id,
                &GoalDraft::new("Run far", 2, "06:30").with_priority(Priority::Low),
            )
            .unwrap();
        assert_eq!(edited.id, goal.id);
        assert_eq!(edited.date, goal.date);
        assert_eq!(edited.recurrence, Recurrence::Weekly);
        assert!(edited.completed);
        assert_eq!(edited.description, "Run far");
        assert_eq!(edited.priority, Priority::Low);
    }

    #[test]
    fn invalid_edit_leaves_goal_untouched() {
        let store = store();
        let goal = store
            .add_goal(day(), &GoalDraft::new("Read", 1, "21:00"), Recurrence::None)
            .unwrap();
        let err = store
            .edit_goal(goal.id, &GoalDraft::new("Read", 30, "21:00"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(store.get(goal.id).unwrap(), goal);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let store = store();
        let draft = GoalDraft::new("x", 1, "10:00");
        assert!(matches!(store.edit_goal(42, &draft), Err(CoreError::NotFound(42))));
        assert!(matches!(store.toggle_complete(42, true), Err(CoreError::NotFound(42))));
        assert!(matches!(store.delete_goal(42), Err(CoreError::NotFound(42))));
        assert!(matches!(store.get(42), Err(CoreError::NotFound(42))));
    }

    #[test]
    fn counts_track_completion() {
        let store = store();
        for n in 0..3 {
            store
                .add_goal(day(), &GoalDraft::new(format!("g{n}"), 1, "09:00"), Recurrence::None)
                .unwrap();
        }
        let first = store.query_goals(day(), GoalFilter::All).unwrap()[0].id;
        store.toggle_complete(first, true).unwrap();

        let counts = store.daily_counts(day()).unwrap();
        assert_eq!(counts, DailyCounts { total: 3, completed: 1 });
        assert_eq!(counts.remaining(), 2);
    }
}
