// src/config/policy.rs

//! Resolved, immutable configuration handed to the rest of the crate.
//!
//! Nothing in here is re-validated downstream: a present sub-config is
//! assumed complete and internally consistent.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::types::{HealthyExitCodes, RunAsUser};

/// How to run the child and how to judge the result.
#[derive(Debug, Clone)]
pub struct RunPolicy {
    pub program: String,
    pub args: Vec<String>,
    /// `None` means "inherit runner's working directory".
    pub work_dir: Option<PathBuf>,
    pub job_name: String,
    pub healthy_exit_codes: HealthyExitCodes,
    pub retries: u32,
    pub retry_delay: Duration,
    pub print_if_match: Vec<String>,
    pub print_if_not_match: Vec<String>,
    pub always_print: bool,
    pub hide_env: bool,
    pub run_as: Option<RunAsUser>,
}

impl RunPolicy {
    /// Policy with defaults: one attempt, `{0}` healthy, job named after the
    /// program's file name.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let job_name = default_job_name(&program);
        Self {
            program,
            args,
            work_dir: None,
            job_name,
            healthy_exit_codes: HealthyExitCodes::default(),
            retries: 0,
            retry_delay: Duration::ZERO,
            print_if_match: Vec::new(),
            print_if_not_match: Vec::new(),
            always_print: false,
            hide_env: false,
            run_as: None,
        }
    }

    /// The command line as executed, shell-quoted.
    pub fn command_line(&self) -> String {
        shell_words::join(std::iter::once(&self.program).chain(self.args.iter()))
    }

    /// Total number of attempts the engine may make.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

fn default_job_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string())
}

/// Delivery targets. Each `Some` is tried once whenever output is surfaced.
#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    pub mail: Option<MailConfig>,
    pub ntfy: Option<NtfyConfig>,
    pub discord: Option<DiscordConfig>,
    pub slack: Option<SlackConfig>,
    /// Fetched after a healthy run, independent of surfacing.
    pub success_notify_url: Option<String>,
}

impl DeliveryConfig {
    pub fn is_empty(&self) -> bool {
        self.mail.is_none() && self.ntfy.is_none() && self.discord.is_none() && self.slack.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub to: String,
    pub from: String,
    pub smtp_user: String,
    pub smtp_password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub tab_replacement: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NtfyConfig {
    pub server: Url,
    pub topic: String,
    pub tags: Vec<String>,
    pub priority: u8,
    pub email: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_url: String,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub webhook_url: String,
    pub username: Option<String>,
    pub icon_emoji: Option<String>,
}

/// Ownership applied to the log directory and file when running as another
/// identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOwner {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// `None` disables log persistence.
    pub dir: Option<PathBuf>,
    pub owner: Option<LogOwner>,
}

/// Output of [`crate::config::resolve`].
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub policy: RunPolicy,
    pub delivery: DeliveryConfig,
    pub log: LogConfig,
    /// Non-fatal anomalies found while resolving; shown in the report.
    pub warnings: Vec<String>,
}
