//! Daily progress summary: goals completed and hours logged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::goal::GoalStore;
use crate::hourly_log::HourlyLog;
use crate::storage::{GoalAdapter, LogAdapter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub date: NaiveDate,
    pub total_goals: u32,
    pub completed_goals: u32,
    pub hours_logged: u32,
}

impl ProgressSummary {
    /// Completed / total, 0.0 for a day without goals.
    pub fn completion_ratio(&self) -> f64 {
        if self.total_goals == 0 {
            return 0.0;
        }
        self.completed_goals as f64 / self.total_goals as f64
    }
}

pub fn summary<G, L>(
    goals: &GoalStore<G>,
    log: &HourlyLog<L>,
    date: NaiveDate,
) -> Result<ProgressSummary>
where
    G: GoalAdapter,
    L: LogAdapter,
{
    let counts = goals.daily_counts(date)?;
    Ok(ProgressSummary {
        date,
        total_goals: counts.total,
        completed_goals: counts.completed,
        hours_logged: log.hours_logged(date)?,
    })
}
