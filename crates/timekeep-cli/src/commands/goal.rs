//! Daily goal commands for CLI.

use chrono::NaiveDate;
use clap::Subcommand;
use timekeep_core::{
    Config, Goal, GoalDraft, GoalFilter, GoalId, GoalStore, Priority, Recurrence,
};

use super::{date_or_today, open_store, print_json};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a goal
    Add {
        /// What to accomplish
        description: String,
        /// Hours to spend (1-24)
        #[arg(long, allow_negative_numbers = true)]
        hours: i64,
        /// Start time as HH:MM
        #[arg(long)]
        start: String,
        /// Priority: high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,
        /// Recurrence: none, daily, weekly or monthly
        #[arg(long, default_value = "none")]
        recurrence: Recurrence,
        /// Day the goal belongs to (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Edit a goal's description, hours, start time or priority
    Edit {
        /// Goal ID
        id: GoalId,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New hours
        #[arg(long, allow_negative_numbers = true)]
        hours: Option<i64>,
        /// New start time
        #[arg(long)]
        start: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Mark a goal completed
    Done {
        /// Goal ID
        id: GoalId,
    },
    /// Mark a goal not completed
    Undo {
        /// Goal ID
        id: GoalId,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: GoalId,
    },
    /// List goals for a day
    List {
        /// Day to list (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// all, completed or not-completed
        #[arg(long, default_value = "all")]
        filter: GoalFilter,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Total and completed goal counts for a day
    Counts {
        /// Day to count (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_goal(goal: &Goal) {
    let mark = if goal.completed { "x" } else { " " };
    let recurrence = match goal.recurrence {
        Recurrence::None => String::new(),
        other => format!(" ({other})"),
    };
    println!(
        "{:>4} [{mark}] {} {:>2}h {:<6} {}{recurrence}",
        goal.id,
        goal.start_time_hhmm(),
        goal.hours,
        goal.priority,
        goal.description,
    );
}

pub fn run(action: GoalAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = GoalStore::new(open_store(config)?);

    match action {
        GoalAction::Add {
            description,
            hours,
            start,
            priority,
            recurrence,
            date,
        } => {
            let draft = GoalDraft::new(description, hours, start).with_priority(priority);
            let goal = store.add_goal(date_or_today(date), &draft, recurrence)?;
            println!("Goal added: {}", goal.id);
        }
        GoalAction::Edit {
            id,
            description,
            hours,
            start,
            priority,
        } => {
            let current = store.get(id)?;
            let hours = hours.unwrap_or_else(|| i64::from(current.hours));
            let start = start.unwrap_or_else(|| current.start_time_hhmm());
            let draft = GoalDraft::new(description.unwrap_or(current.description), hours, start)
                .with_priority(priority.unwrap_or(current.priority));
            store.edit_goal(id, &draft)?;
            println!("Goal updated: {id}");
        }
        GoalAction::Done { id } => {
            store.toggle_complete(id, true)?;
            println!("Goal completed: {id}");
        }
        GoalAction::Undo { id } => {
            store.toggle_complete(id, false)?;
            println!("Goal reopened: {id}");
        }
        GoalAction::Delete { id } => {
            store.delete_goal(id)?;
            println!("Goal deleted: {id}");
        }
        GoalAction::List { date, filter, json } => {
            let goals = store.query_goals(date_or_today(date), filter)?;
            if json {
                print_json(&goals)?;
            } else if goals.is_empty() {
                println!("No goals.");
            } else {
                goals.iter().for_each(print_goal);
            }
        }
        GoalAction::Counts { date, json } => {
            let counts = store.daily_counts(date_or_today(date))?;
            if json {
                print_json(&counts)?;
            } else {
                println!("{}/{} completed", counts.completed, counts.total);
            }
        }
    }
    Ok(())
}
