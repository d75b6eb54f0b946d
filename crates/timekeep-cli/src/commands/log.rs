use chrono::NaiveDate;
use clap::Subcommand;
use timekeep_core::{Config, HourlyLog};

use super::{date_or_today, open_store, print_json};

#[derive(Subcommand)]
pub enum LogAction {
    /// Record what was done in an hour
    Add {
        /// Hour of day (0-23)
        #[arg(allow_negative_numbers = true)]
        hour: i64,
        /// What was done
        text: String,
        /// Day of the entry (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List entries
    List {
        /// Day to list (default: today)
        #[arg(long, conflicts_with = "all")]
        date: Option<NaiveDate>,
        /// List every entry, including undated ones
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: LogAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let log = HourlyLog::new(open_store(config)?);

    match action {
        LogAction::Add { hour, text, date } => {
            let entry = log.record(date_or_today(date), hour, &text)?;
            println!("Logged {}:00 ({})", entry.hour, entry.id);
        }
        LogAction::List { date, all, json } => {
            let entries = if all {
                log.all_entries()?
            } else {
                log.entries_for(date_or_today(date))?
            };
            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No entries.");
            } else {
                for entry in &entries {
                    let day = entry
                        .date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "----------".into());
                    println!("{day} {:>2}:00 {}", entry.hour, entry.text);
                }
            }
        }
    }
    Ok(())
}
