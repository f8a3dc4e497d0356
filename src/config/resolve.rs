// src/config/resolve.rs

//! Merge CLI/env values with the optional defaults file, validate, and
//! produce a [`ResolvedConfig`].
//!
//! Hard errors are reserved for inputs that make the run meaningless (no
//! program, conflicting identities, unparsable URLs). Anything recoverable
//! becomes a setup warning that ends up in the report.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::cli::CliArgs;
use crate::config::identity::resolve_run_as;
use crate::config::model::RawConfigFile;
use crate::config::policy::{
    DeliveryConfig, DiscordConfig, LogConfig, LogOwner, MailConfig, NtfyConfig, ResolvedConfig,
    RunPolicy, SlackConfig,
};
use crate::errors::{Result, RunnerError};
use crate::types::HealthyExitCodes;

pub const DEFAULT_SMTP_PORT: u16 = 25;
pub const DEFAULT_NTFY_PRIORITY: u8 = 3;

pub fn resolve(args: &CliArgs, file: &RawConfigFile, hostname: &str) -> Result<ResolvedConfig> {
    if args.program.trim().is_empty() {
        return Err(RunnerError::ConfigError("no program given".to_string()));
    }

    let mut warnings = Vec::new();

    let mut policy = RunPolicy::new(args.program.clone(), args.program_args.clone());
    if let Some(name) = non_empty(&args.job_name) {
        policy.job_name = name;
    }
    policy.work_dir = args.work_dir.clone();
    policy.healthy_exit_codes = HealthyExitCodes::new(args.healthy_exit.iter().copied());
    policy.retries = args.retries;
    policy.retry_delay = Duration::from_secs(args.retry_delay);
    policy.print_if_match = args.print_if_match.clone();
    policy.print_if_not_match = args.print_if_not_match.clone();
    policy.always_print = args.always_print;
    policy.hide_env = args.hide_env;
    policy.run_as = resolve_run_as(args.user.as_deref(), args.uid, args.gid, &mut warnings)?;

    let log = LogConfig {
        dir: args.log_dir.clone().or_else(|| file.log.dir.clone()),
        owner: policy.run_as.as_ref().map(|r| LogOwner {
            uid: r.uid,
            gid: r.gid,
        }),
    };

    let delivery = DeliveryConfig {
        mail: resolve_mail(args, file, hostname, &mut warnings),
        ntfy: resolve_ntfy(args, file, &mut warnings)?,
        discord: pick(&args.discord_webhook, &file.discord.webhook).map(|url| DiscordConfig {
            webhook_url: with_scheme(&url),
        }),
        slack: pick(&args.slack_webhook, &file.slack.webhook).map(|url| SlackConfig {
            webhook_url: with_scheme(&url),
            username: pick(&args.slack_username, &file.slack.username),
            icon_emoji: pick(&args.slack_icon_emoji, &file.slack.icon_emoji),
        }),
        success_notify_url: pick(&args.success_notify, &file.success.notify_url)
            .map(|url| with_scheme(&url)),
    };

    debug!(
        job = %policy.job_name,
        retries = policy.retries,
        mail = delivery.mail.is_some(),
        ntfy = delivery.ntfy.is_some(),
        discord = delivery.discord.is_some(),
        slack = delivery.slack.is_some(),
        warnings = warnings.len(),
        "configuration resolved"
    );

    Ok(ResolvedConfig {
        policy,
        delivery,
        log,
        warnings,
    })
}

fn resolve_mail(
    args: &CliArgs,
    file: &RawConfigFile,
    hostname: &str,
    warnings: &mut Vec<String>,
) -> Option<MailConfig> {
    let to = pick(&args.mailto, &file.mail.to)?;
    if !to.contains('@') {
        warnings.push(format!("mail recipient '{to}' is not an email address; mail disabled"));
        return None;
    }

    let Some(smtp_host) = pick(&args.smtp_host, &file.mail.smtp_host) else {
        warnings.push(
            "If using --mailto (or RUNNER_MAILTO), you must also specify --smtp-host (RUNNER_SMTP_HOST); mail disabled"
                .to_string(),
        );
        return None;
    };

    let raw_port = args.smtp_port.or(file.mail.smtp_port);
    let smtp_port = match raw_port {
        None => DEFAULT_SMTP_PORT,
        Some(p) => match u16::try_from(p) {
            Ok(port) if port >= 1 => port,
            _ => {
                warnings.push(format!(
                    "Invalid SMTP port {p} given; using default of {DEFAULT_SMTP_PORT} instead"
                ));
                DEFAULT_SMTP_PORT
            }
        },
    };

    Some(MailConfig {
        to,
        from: pick(&args.mail_from, &file.mail.from).unwrap_or_else(|| format!("runner@{hostname}")),
        smtp_user: pick(&args.smtp_user, &file.mail.smtp_user).unwrap_or_default(),
        smtp_password: pick(&args.smtp_pass, &file.mail.smtp_pass).unwrap_or_default(),
        smtp_host,
        smtp_port,
        // Not trimmed: the replacement is usually whitespace.
        tab_replacement: args
            .mail_tab_char
            .clone()
            .or_else(|| file.mail.tab_char.clone())
            .filter(|s| !s.is_empty()),
    })
}

fn resolve_ntfy(
    args: &CliArgs,
    file: &RawConfigFile,
    warnings: &mut Vec<String>,
) -> Result<Option<NtfyConfig>> {
    let priority = match args.ntfy_priority.or(file.ntfy.priority) {
        None => DEFAULT_NTFY_PRIORITY,
        Some(p) if (1..=5).contains(&p) => p as u8,
        Some(p) => {
            warnings.push(format!(
                "Invalid ntfy priority {p} given; must be between 1-5, inclusive. Using {DEFAULT_NTFY_PRIORITY}."
            ));
            DEFAULT_NTFY_PRIORITY
        }
    };

    let Some(server) = pick(&args.ntfy_server, &file.ntfy.server) else {
        return Ok(None);
    };
    let server = with_scheme(&server);
    let server = Url::parse(&server).map_err(|e| {
        RunnerError::ConfigError(format!("failed to parse the given ntfy server URL ('{server}'): {e}"))
    })?;

    let Some(topic) = pick(&args.ntfy_topic, &file.ntfy.topic) else {
        warnings.push(
            "If using --ntfy-server (or RUNNER_NTFY_SERVER), you must also specify --ntfy-topic (RUNNER_NTFY_TOPIC); ntfy disabled"
                .to_string(),
        );
        return Ok(None);
    };

    let tags = pick(&args.ntfy_tags, &file.ntfy.tags)
        .map(|t| {
            t.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(NtfyConfig {
        server,
        topic,
        tags,
        priority,
        email: pick(&args.ntfy_email, &file.ntfy.email),
        access_token: pick(&args.ntfy_access_token, &file.ntfy.access_token),
    }))
}

/// Flag/env value if non-empty, else the file value if non-empty.
fn pick(cli: &Option<String>, file: &Option<String>) -> Option<String> {
    non_empty(cli).or_else(|| non_empty(file))
}

fn non_empty(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Bare hostnames are assumed to be HTTPS.
fn with_scheme(url: &str) -> String {
    if url.to_ascii_lowercase().starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(program: &str) -> CliArgs {
        CliArgs {
            program: program.to_string(),
            ..CliArgs::default()
        }
    }

    #[test]
    fn empty_program_is_config_error() {
        let res = resolve(&args("  "), &RawConfigFile::default(), "host");
        assert!(matches!(res, Err(RunnerError::ConfigError(_))));
    }

    #[test]
    fn defaults_produce_single_attempt_policy() {
        let cfg = resolve(&args("/bin/true"), &RawConfigFile::default(), "host").unwrap();
        assert_eq!(cfg.policy.job_name, "true");
        assert!(cfg.policy.healthy_exit_codes.contains(0));
        assert_eq!(cfg.policy.max_attempts(), 1);
        assert!(cfg.delivery.is_empty());
        assert!(cfg.log.dir.is_none());
        assert!(cfg.warnings.is_empty());
    }

    #[test]
    fn mailto_without_host_warns_and_disables_mail() {
        let mut a = args("true");
        a.mailto = Some("ops@example.com".into());
        let cfg = resolve(&a, &RawConfigFile::default(), "host").unwrap();
        assert!(cfg.delivery.mail.is_none());
        assert_eq!(cfg.warnings.len(), 1);
        assert!(cfg.warnings[0].contains("--smtp-host"));
    }

    #[test]
    fn tab_replacement_keeps_whitespace() {
        let mut a = args("true");
        a.mailto = Some("ops@example.com".into());
        a.smtp_host = Some("smtp.example.com".into());
        a.mail_tab_char = Some("    ".into());
        let cfg = resolve(&a, &RawConfigFile::default(), "host").unwrap();
        assert_eq!(cfg.delivery.mail.unwrap().tab_replacement.as_deref(), Some("    "));
    }

    #[test]
    fn invalid_smtp_port_falls_back_to_default() {
        let mut a = args("true");
        a.mailto = Some("ops@example.com".into());
        a.smtp_host = Some("smtp.example.com".into());
        a.smtp_port = Some(70_000);
        let cfg = resolve(&a, &RawConfigFile::default(), "box").unwrap();
        let mail = cfg.delivery.mail.unwrap();
        assert_eq!(mail.smtp_port, DEFAULT_SMTP_PORT);
        assert_eq!(mail.from, "runner@box");
        assert!(cfg.warnings[0].contains("Invalid SMTP port 70000"));
    }

    #[test]
    fn cli_values_override_file_values() {
        let mut file = RawConfigFile::default();
        file.mail.to = Some("file@example.com".into());
        file.mail.smtp_host = Some("file-smtp".into());
        let mut a = args("true");
        a.mailto = Some("cli@example.com".into());
        let cfg = resolve(&a, &file, "host").unwrap();
        let mail = cfg.delivery.mail.unwrap();
        assert_eq!(mail.to, "cli@example.com");
        assert_eq!(mail.smtp_host, "file-smtp");
    }

    #[test]
    fn ntfy_server_gets_scheme_and_tags_are_split() {
        let mut a = args("true");
        a.ntfy_server = Some("ntfy.example.com".into());
        a.ntfy_topic = Some("jobs".into());
        a.ntfy_tags = Some("backup, ,nightly".into());
        let cfg = resolve(&a, &RawConfigFile::default(), "host").unwrap();
        let ntfy = cfg.delivery.ntfy.unwrap();
        assert_eq!(ntfy.server.as_str(), "https://ntfy.example.com/");
        assert_eq!(ntfy.tags, vec!["backup", "nightly"]);
        assert_eq!(ntfy.priority, DEFAULT_NTFY_PRIORITY);
    }

    #[test]
    fn ntfy_without_topic_warns() {
        let mut a = args("true");
        a.ntfy_server = Some("https://ntfy.sh".into());
        let cfg = resolve(&a, &RawConfigFile::default(), "host").unwrap();
        assert!(cfg.delivery.ntfy.is_none());
        assert!(cfg.warnings[0].contains("--ntfy-topic"));
    }

    #[test]
    fn out_of_range_ntfy_priority_is_a_warning() {
        let mut a = args("true");
        a.ntfy_server = Some("https://ntfy.sh".into());
        a.ntfy_topic = Some("jobs".into());
        a.ntfy_priority = Some(9);
        let cfg = resolve(&a, &RawConfigFile::default(), "host").unwrap();
        assert_eq!(cfg.delivery.ntfy.unwrap().priority, DEFAULT_NTFY_PRIORITY);
        assert!(cfg.warnings[0].contains("Invalid ntfy priority 9"));
    }

    #[test]
    fn webhooks_get_scheme() {
        let mut a = args("true");
        a.discord_webhook = Some("discord.com/api/webhooks/1/abc".into());
        a.slack_webhook = Some("http://hooks.local/x".into());
        let cfg = resolve(&a, &RawConfigFile::default(), "host").unwrap();
        assert_eq!(
            cfg.delivery.discord.unwrap().webhook_url,
            "https://discord.com/api/webhooks/1/abc"
        );
        assert_eq!(cfg.delivery.slack.unwrap().webhook_url, "http://hooks.local/x");
    }

    #[test]
    fn explicit_job_name_and_retry_delay() {
        let mut a = args("/opt/bin/sync");
        a.job_name = Some("nightly sync".into());
        a.retries = 3;
        a.retry_delay = 5;
        a.healthy_exit = vec![0, 2];
        let cfg = resolve(&a, &RawConfigFile::default(), "host").unwrap();
        assert_eq!(cfg.policy.job_name, "nightly sync");
        assert_eq!(cfg.policy.retry_delay, Duration::from_secs(5));
        assert!(cfg.policy.healthy_exit_codes.contains(2));
    }
}
