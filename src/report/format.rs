// src/report/format.rs

use std::fmt::Write as _;

use crate::config::RunPolicy;
use crate::engine::RunOutcome;
use crate::fs::log_file_name;

use super::env_privacy::EnvPrivacy;
use super::{EnvSnapshot, Report};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

/// Render the run report.
///
/// Pure: the same inputs always give the same text. All clock readings come
/// from `outcome`.
pub fn format_report(
    policy: &RunPolicy,
    outcome: &RunOutcome,
    env: &EnvSnapshot,
    privacy: &EnvPrivacy,
) -> Report {
    let status = outcome.status();
    let summary_line = format!("[{}] {} running {}", env.hostname, status, outcome.job_name);
    let work_dir = policy.work_dir.as_ref().unwrap_or(&env.current_dir);
    let duration = outcome
        .duration()
        .to_std()
        .map(|d| format!("{d:?}"))
        .unwrap_or_else(|_| "0s".to_string());

    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(text, "{summary_line}");
    let _ = writeln!(text, "Working directory: {}", work_dir.display());
    let _ = writeln!(text, "Command: {}", policy.command_line());
    let _ = writeln!(text, "Exit code: {}", outcome.exit_code);
    text.push('\n');
    let _ = writeln!(text, "Duration: {duration}");
    let _ = writeln!(text, "Start time: {}", outcome.started.format(TIMESTAMP_FORMAT));
    let _ = writeln!(text, "End time: {}", outcome.ended.format(TIMESTAMP_FORMAT));
    let _ = writeln!(text, "Retries allowed: {}", policy.retries);
    let _ = writeln!(text, "Attempts made: {}", outcome.attempts);
    if let Some(run_as) = &policy.run_as {
        let _ = writeln!(text, "Run as: {run_as}");
    }
    text.push('\n');

    if !policy.hide_env {
        text.push_str("Environment:\n");
        for (name, value) in &env.vars {
            if let Some(shown) = privacy.render(name, value) {
                let _ = writeln!(text, "\t{name}={shown}");
            }
        }
        text.push('\n');
    }

    if !outcome.warnings.is_empty() {
        text.push_str("Setup warnings:\n");
        for warning in &outcome.warnings {
            let _ = writeln!(text, "\t- {warning}");
        }
        text.push('\n');
    }

    text.push_str("--- Program output follows: ---\n\n");
    if outcome.output.is_empty() {
        text.push_str("(no output produced)\n");
    } else {
        text.push_str(&outcome.output);
        text.push('\n');
    }

    Report {
        text,
        summary_line,
        status,
        log_file_name: log_file_name(&outcome.job_name, &outcome.started),
    }
}
