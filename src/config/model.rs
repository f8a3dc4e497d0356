// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Optional TOML file with defaults for log and delivery settings.
///
/// ```toml
/// [log]
/// dir = "/var/log/runner"
///
/// [mail]
/// to = "ops@example.com"
/// smtp_host = "smtp.example.com"
/// smtp_port = 587
///
/// [ntfy]
/// server = "ntfy.sh"
/// topic = "backups"
/// priority = 4
///
/// [discord]
/// webhook = "https://discord.com/api/webhooks/..."
/// ```
///
/// Every table and key is optional. Flags and `RUNNER_*` environment
/// variables take precedence over anything given here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfigFile {
    pub log: LogSection,
    pub mail: MailSection,
    pub ntfy: NtfySection,
    pub discord: DiscordSection,
    pub slack: SlackSection,
    pub success: SuccessSection,
}

/// `[log]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    pub dir: Option<PathBuf>,
}

/// `[mail]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailSection {
    pub to: Option<String>,
    pub from: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i64>,
    pub tab_char: Option<String>,
}

/// `[ntfy]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NtfySection {
    pub server: Option<String>,
    pub topic: Option<String>,
    /// Comma-separated, like `--ntfy-tags`.
    pub tags: Option<String>,
    pub priority: Option<i64>,
    pub email: Option<String>,
    pub access_token: Option<String>,
}

/// `[discord]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscordSection {
    pub webhook: Option<String>,
}

/// `[slack]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlackSection {
    pub webhook: Option<String>,
    pub username: Option<String>,
    pub icon_emoji: Option<String>,
}

/// `[success]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuccessSection {
    /// URL fetched with GET after every healthy run.
    pub notify_url: Option<String>,
}
