// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Most delivery settings can also come from `RUNNER_*` environment variables
//! (clap's `env` feature); an explicit flag always wins over the variable.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `runner`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "runner",
    version,
    about = "Run the given program, only printing its output if the program exits with an error, \
             or if the output contains (or does not contain) certain substrings.",
    override_usage = "runner [OPTIONS] -- /path/to/program --program-args"
)]
pub struct CliArgs {
    /// The program to run.
    #[arg(value_name = "PROGRAM", required = true)]
    pub program: String,

    /// Arguments passed to the program.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub program_args: Vec<String>,

    // job control
    /// "Healthy" or "success" exit codes. May be given multiple times. (default: 0)
    #[arg(long = "healthy-exit", value_name = "CODE", allow_negative_numbers = true)]
    pub healthy_exit: Vec<i32>,

    /// If the command fails, retry it this many times.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub retries: u32,

    /// If the command fails, wait this many seconds before retrying.
    #[arg(long = "retry-delay", value_name = "SECS", default_value_t = 0)]
    pub retry_delay: u64,

    // output
    /// Print/deliver output if the given (case-sensitive) string appears in the
    /// program's output, even after a healthy exit. May be given multiple times.
    #[arg(long = "print-if-match", value_name = "STRING")]
    pub print_if_match: Vec<String>,

    /// Print/deliver output if the given (case-sensitive) string does not appear
    /// in the program's output, even after a healthy exit. May be given multiple times.
    #[arg(long = "print-if-not-match", value_name = "STRING")]
    pub print_if_not_match: Vec<String>,

    /// Always print/deliver the program's output.
    #[arg(long = "always-print")]
    pub always_print: bool,

    /// Job name used in notifications and the log file name. (default: program name, without path)
    #[arg(long = "job-name", value_name = "NAME")]
    pub job_name: Option<String>,

    /// Hide the process environment, which is normally part of the report.
    #[arg(long = "hide-env")]
    pub hide_env: bool,

    /// Directory to write run logs to.
    #[arg(long = "log-dir", value_name = "DIR", env = "RUNNER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Working directory for the program.
    #[arg(long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    // run-as identity
    /// Run the program as the given user. Ignored on non-Unix platforms.
    #[arg(long, value_name = "NAME", conflicts_with_all = ["uid", "gid"])]
    pub user: Option<String>,

    /// Run the program as the given UID. Ignored on non-Unix platforms.
    #[arg(long, value_name = "UID")]
    pub uid: Option<u32>,

    /// Run the program as the given GID. Ignored on non-Unix platforms.
    #[arg(long, value_name = "GID")]
    pub gid: Option<u32>,

    // mail
    /// Send an email to this address whenever the output is surfaced.
    #[arg(long, value_name = "ADDRESS", env = "RUNNER_MAILTO")]
    pub mailto: Option<String>,

    /// From: address for emails. (default: runner@hostname)
    #[arg(long = "mail-from", value_name = "ADDRESS", env = "RUNNER_MAIL_FROM")]
    pub mail_from: Option<String>,

    #[arg(long = "smtp-user", value_name = "USER", env = "RUNNER_SMTP_USER")]
    pub smtp_user: Option<String>,

    #[arg(long = "smtp-pass", value_name = "PASS", env = "RUNNER_SMTP_PASS", hide_env_values = true)]
    pub smtp_pass: Option<String>,

    #[arg(long = "smtp-host", value_name = "HOST", env = "RUNNER_SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP port. 465 uses implicit TLS, 587 uses STARTTLS. (default: 25)
    #[arg(long = "smtp-port", value_name = "PORT", env = "RUNNER_SMTP_PORT")]
    pub smtp_port: Option<i64>,

    /// Replace tab characters in emailed output with this string.
    #[arg(long = "mail-tab-char", value_name = "STRING", env = "RUNNER_MAIL_TAB_CHAR")]
    pub mail_tab_char: Option<String>,

    // ntfy
    /// ntfy server to notify whenever the output is surfaced.
    #[arg(long = "ntfy-server", value_name = "URL", env = "RUNNER_NTFY_SERVER")]
    pub ntfy_server: Option<String>,

    #[arg(long = "ntfy-topic", value_name = "TOPIC", env = "RUNNER_NTFY_TOPIC")]
    pub ntfy_topic: Option<String>,

    /// Comma-separated list of ntfy tags.
    #[arg(long = "ntfy-tags", value_name = "TAGS", env = "RUNNER_NTFY_TAGS")]
    pub ntfy_tags: Option<String>,

    /// ntfy priority, 1-5 inclusive. (default: 3)
    #[arg(long = "ntfy-priority", value_name = "N", env = "RUNNER_NTFY_PRIORITY", allow_negative_numbers = true)]
    pub ntfy_priority: Option<i64>,

    /// Ask ntfy to forward the notification to this email address.
    #[arg(long = "ntfy-email", value_name = "ADDRESS", env = "RUNNER_NTFY_EMAIL")]
    pub ntfy_email: Option<String>,

    #[arg(long = "ntfy-access-token", value_name = "TOKEN", env = "RUNNER_NTFY_ACCESS_TOKEN", hide_env_values = true)]
    pub ntfy_access_token: Option<String>,

    // webhooks
    /// Discord webhook to post to whenever the output is surfaced.
    #[arg(long = "discord-webhook", value_name = "URL", env = "RUNNER_DISCORD_WEBHOOK")]
    pub discord_webhook: Option<String>,

    /// Slack incoming webhook to post to whenever the output is surfaced.
    #[arg(long = "slack-webhook", value_name = "URL", env = "RUNNER_SLACK_WEBHOOK")]
    pub slack_webhook: Option<String>,

    #[arg(long = "slack-username", value_name = "NAME", env = "RUNNER_SLACK_USERNAME")]
    pub slack_username: Option<String>,

    #[arg(long = "slack-icon-emoji", value_name = "EMOJI", env = "RUNNER_SLACK_ICON_EMOJI")]
    pub slack_icon_emoji: Option<String>,

    /// URL to GET after a healthy run (e.g. an uptime monitor push URL).
    #[arg(long = "success-notify", value_name = "URL", env = "RUNNER_SUCCESS_NOTIFY_URL")]
    pub success_notify: Option<String>,

    // ambient
    /// Optional TOML file providing defaults for log and delivery settings.
    #[arg(long, value_name = "PATH", env = "RUNNER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Diagnostics level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUNNER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
