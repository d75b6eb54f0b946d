//! Process-wide `tracing` subscriber setup.
//!
//! Events go to stderr so command output on stdout stays machine-readable.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Level used when the configured one does not parse.
pub const FALLBACK_LEVEL: &str = "warn";

/// Check that `level` is a valid filter directive without installing it.
pub fn validate_level(level: &str) -> Result<(), String> {
    EnvFilter::try_new(level)
        .map(|_| ())
        .map_err(|e| format!("invalid log level `{level}`: {e}"))
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Calling this more than once is a no-op.
///
/// # Errors
/// Returns an error if `level` is not a valid filter directive or another
/// subscriber was already installed by someone else.
pub fn init(level: &str) -> Result<(), String> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| format!("invalid log level `{level}`: {e}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| format!("failed to install log subscriber: {e}"))?;

    let _ = INITIALIZED.set(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_level_accepts_directives() {
        assert!(validate_level("info").is_ok());
        assert!(validate_level("timekeep_core=debug,warn").is_ok());
        assert!(validate_level("info,[").is_err());
    }

    #[test]
    fn init_is_idempotent() {
        assert!(init("warn").is_ok());
        assert!(init("debug").is_ok());
    }
}
