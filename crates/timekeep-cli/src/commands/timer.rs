use clap::Subcommand;
use std::io::Write;
use timekeep_core::{Config, CountdownSession, Durations, Phase, Preset, Tick};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one focus period followed by one break. Ctrl-C cancels.
    Start {
        /// short (25/5 min) or long (50/10 min); defaults to timer.default_preset
        #[arg(long, conflicts_with_all = ["focus", "break_secs"])]
        preset: Option<Preset>,
        /// Custom focus length in seconds
        #[arg(long, requires = "break_secs")]
        focus: Option<u64>,
        /// Custom break length in seconds
        #[arg(long = "break", requires = "focus")]
        break_secs: Option<u64>,
        /// Print each tick as a JSON line
        #[arg(long)]
        json: bool,
    },
}

fn render(tick: &Tick, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(tick)?);
        return Ok(());
    }
    let label = match tick.phase {
        Phase::Focusing => "Focus",
        Phase::OnBreak => "Break",
        Phase::Finished => "Done",
        Phase::Idle | Phase::Cancelled => return Ok(()),
    };
    let mut out = std::io::stdout().lock();
    write!(out, "\r{label:<5} {:<16}", tick.format_remaining())?;
    if tick.remaining_secs == 0 {
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let TimerAction::Start {
        preset,
        focus,
        break_secs,
        json,
    } = action;

    let durations = match (focus, break_secs) {
        (Some(focus), Some(brk)) => Durations::new(focus, brk)?,
        _ => preset.unwrap_or(config.timer.default_preset).durations(),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let session = CountdownSession::new();
        let mut ticks = session.start(durations)?;
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        loop {
            tokio::select! {
                tick = ticks.next() => match tick {
                    Some(tick) => render(&tick, json)?,
                    None => break,
                },
                _ = &mut ctrl_c => {
                    session.cancel();
                    if !json {
                        println!();
                    }
                    break;
                }
            }
        }
        if session.phase() == Phase::Cancelled {
            eprintln!("timer cancelled");
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
