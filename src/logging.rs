// src/logging.rs

//! Diagnostics for `runner` via `tracing` + `tracing-subscriber`.
//!
//! Filter selection:
//! 1. `--log-level` applies to runner's own events; HTTP and SMTP client
//!    internals stay at `warn` unless `trace` is asked for.
//! 2. Otherwise `RUNNER_LOG` is read as a full `EnvFilter` directive string,
//!    e.g. `debug` or `runner=debug,reqwest=info`.
//! 3. Otherwise `warn`.
//!
//! Everything goes to stderr. Stdout carries the run report and nothing else.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_LEVEL_ENV_VAR: &str = "RUNNER_LOG";

const DEFAULT_DIRECTIVES: &str = "warn";

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_LEVEL_ENV_VAR).ok();
    let directives = select_directives(cli_level, env_value.as_deref());

    let filter = EnvFilter::try_new(&directives)
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .context("building log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising tracing subscriber: {e}"))
}

fn select_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return cli_directives(level);
    }
    match env_value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn cli_directives(level: LogLevel) -> String {
    let own = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => return "trace".to_string(),
    };
    format!("warn,{}={own}", env!("CARGO_CRATE_NAME"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_environment() {
        assert_eq!(
            select_directives(Some(LogLevel::Debug), Some("error")),
            "warn,runner=debug"
        );
    }

    #[test]
    fn trace_opens_up_dependencies_too() {
        assert_eq!(select_directives(Some(LogLevel::Trace), None), "trace");
    }

    #[test]
    fn environment_directives_pass_through() {
        assert_eq!(
            select_directives(None, Some(" runner=info,reqwest=debug ")),
            "runner=info,reqwest=debug"
        );
    }

    #[test]
    fn blank_or_missing_environment_means_warn() {
        assert_eq!(select_directives(None, Some("  ")), "warn");
        assert_eq!(select_directives(None, None), "warn");
    }
}
