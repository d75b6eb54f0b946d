use clap::{CommandFactory, Parser, Subcommand};
use timekeep_core::{logging, Config};

mod commands;

#[derive(Parser)]
#[command(name = "timekeep", version, about = "Daily goals, hourly log and focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Hourly activity log
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Progress summary for a day
    Progress(commands::progress::ProgressArgs),
    /// Focus/break countdown
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    if let Err(e) = logging::init(&config.logging.level) {
        eprintln!("warning: {e}; falling back to `{}`", logging::FALLBACK_LEVEL);
        logging::init(logging::FALLBACK_LEVEL)?;
    }

    match cli.command {
        Commands::Goal { action } => commands::goal::run(action, &config),
        Commands::Log { action } => commands::log::run(action, &config),
        Commands::Progress(args) => commands::progress::run(args, &config),
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "timekeep", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
