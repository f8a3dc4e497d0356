// src/report/mod.rs

//! Human-readable run report.
//!
//! - [`format`] renders a [`RunOutcome`](crate::engine::RunOutcome) plus an
//!   [`EnvSnapshot`] into a [`Report`].
//! - [`env_privacy`] decides which environment variables are omitted or
//!   redacted.

use std::path::PathBuf;

pub mod env_privacy;
pub mod format;

pub use env_privacy::{EnvPrivacy, censor_value};
pub use format::format_report;

use crate::types::Status;

/// Finished report. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Full report body, as printed and persisted.
    pub text: String,
    /// `[host] Succeeded running job`
    pub summary_line: String,
    pub status: Status,
    /// Name of the log file this run is persisted under.
    pub log_file_name: String,
}

impl Report {
    /// Glyph + summary, used as notification title / webhook text.
    pub fn headline(&self) -> String {
        format!("{} {}", self.status.glyph(), self.summary_line)
    }
}

/// Process-level facts the report needs, captured once up front.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    pub hostname: String,
    /// Runner's own working directory; shown when the policy has none.
    pub current_dir: PathBuf,
    pub vars: Vec<(String, String)>,
}

impl EnvSnapshot {
    pub fn capture(hostname: impl Into<String>) -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let vars = std::env::vars_os()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
            .collect();
        Self {
            hostname: hostname.into(),
            current_dir,
            vars,
        }
    }
}
