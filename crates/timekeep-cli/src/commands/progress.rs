use chrono::NaiveDate;
use clap::Args;
use timekeep_core::{progress, Config, GoalStore, HourlyLog};

use super::{date_or_today, open_store, print_json};

#[derive(Args)]
pub struct ProgressArgs {
    /// Day to summarize (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: ProgressArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let goals = GoalStore::new(store.clone());
    let log = HourlyLog::new(store);

    let summary = progress::summary(&goals, &log, date_or_today(args.date))?;
    if args.json {
        print_json(&summary)?;
    } else {
        println!("Progress for {}", summary.date);
        println!(
            "  goals: {}/{} completed ({:.0}%)",
            summary.completed_goals,
            summary.total_goals,
            summary.completion_ratio() * 100.0
        );
        println!("  hours logged: {}", summary.hours_logged);
    }
    Ok(())
}
