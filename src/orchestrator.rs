// src/orchestrator.rs

//! Ties one invocation together: run the engine, format the report, surface
//! it, ping the heartbeat and persist the log.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::RunPolicy;
use crate::deliver::{DeliveryChannel, DeliveryError, deliver_all, notify_success};
use crate::engine::{Engine, RunOutcome};
use crate::errors::{Result, RunnerError};
use crate::exec::ProcessLauncher;
use crate::fs::LogStore;
use crate::report::{EnvPrivacy, EnvSnapshot, Report, format_report};

pub const DELIVERY_ERRORS_HEADER: &str = "--- Runner Delivery Errors ---";

/// What happened during one invocation.
#[derive(Debug)]
pub struct InvocationSummary {
    pub outcome: RunOutcome,
    pub report: Report,
    pub delivery_errors: Vec<DeliveryError>,
    /// `None` when no log directory is configured.
    pub log_path: Option<PathBuf>,
}

pub struct Orchestrator<L: ProcessLauncher> {
    engine: Engine<L>,
    channels: Vec<Box<dyn DeliveryChannel>>,
    heartbeat_url: Option<String>,
    log_store: Box<dyn LogStore>,
    log_dir: Option<PathBuf>,
    env: EnvSnapshot,
    privacy: EnvPrivacy,
}

impl<L: ProcessLauncher> Orchestrator<L> {
    pub fn new(launcher: L, log_store: Box<dyn LogStore>, env: EnvSnapshot) -> Self {
        let privacy = EnvPrivacy::from_vars(&env.vars);
        Self {
            engine: Engine::new(launcher),
            channels: Vec::new(),
            heartbeat_url: None,
            log_store,
            log_dir: None,
            env,
            privacy,
        }
    }

    pub fn with_channels(mut self, channels: Vec<Box<dyn DeliveryChannel>>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_heartbeat(mut self, url: Option<String>) -> Self {
        self.heartbeat_url = url;
        self
    }

    pub fn with_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.log_dir = dir;
        self
    }

    /// Run `policy` to completion.
    ///
    /// A surfaced report is written to `out` before delivery starts. Only
    /// launch and persistence failures are returned as errors; delivery
    /// failures end up in the summary and the persisted log.
    pub async fn execute<W: Write>(
        &mut self,
        policy: &RunPolicy,
        warnings: Vec<String>,
        out: &mut W,
    ) -> Result<InvocationSummary> {
        let outcome = self.engine.run(policy, warnings).await?;
        let report = format_report(policy, &outcome, &self.env, &self.privacy);

        let mut delivery_errors = Vec::new();
        if outcome.should_surface {
            if let Err(err) = out.write_all(report.text.as_bytes()).and_then(|()| out.flush()) {
                warn!(error = %err, "failed to print report");
            }
            delivery_errors = deliver_all(&self.channels, &report).await;
        } else {
            debug!(job = %outcome.job_name, "report not surfaced");
        }

        if let Some(url) = self.heartbeat_url.as_deref().filter(|_| outcome.success) {
            match notify_success(url).await {
                Ok(()) => info!("success heartbeat sent"),
                Err(err) => {
                    warn!(error = %err, "success heartbeat failed");
                    delivery_errors.push(err);
                }
            }
        }

        let log_path = match &self.log_dir {
            Some(dir) => {
                let content = log_content(&report, &delivery_errors);
                let path = self
                    .log_store
                    .persist(dir, &report.log_file_name, &content)
                    .map_err(|err| RunnerError::PersistError {
                        path: dir.join(&report.log_file_name),
                        message: format!("{err:#}"),
                    })?;
                info!(path = %path.display(), "log persisted");
                Some(path)
            }
            None => None,
        };

        Ok(InvocationSummary {
            outcome,
            report,
            delivery_errors,
            log_path,
        })
    }
}

/// Report text followed by a delivery errors section when any channel
/// failed.
pub fn log_content(report: &Report, errors: &[DeliveryError]) -> String {
    let mut content = report.text.clone();
    if !errors.is_empty() {
        let _ = write!(content, "\n{DELIVERY_ERRORS_HEADER}\n\n");
        for err in errors {
            let _ = writeln!(content, "{err}");
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    fn report() -> Report {
        Report {
            text: "body\n".into(),
            summary_line: "[h] Failed running x".into(),
            status: Status::Failed,
            log_file_name: "x.log".into(),
        }
    }

    #[test]
    fn log_content_without_errors_is_report_text() {
        assert_eq!(log_content(&report(), &[]), "body\n");
    }

    #[test]
    fn log_content_lists_each_error() {
        let errors = vec![
            DeliveryError::Status {
                channel: "discord",
                status: 500,
                body: "boom".into(),
            },
            DeliveryError::Transport {
                channel: "slack",
                message: "refused".into(),
            },
        ];
        assert_eq!(
            log_content(&report(), &errors),
            "body\n\n--- Runner Delivery Errors ---\n\n\
             discord: unexpected response (HTTP 500): boom\n\
             slack: request failed: refused\n"
        );
    }
}
