// src/lib.rs

pub mod cli;
pub mod config;
pub mod deliver;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod orchestrator;
pub mod report;
pub mod types;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_optional;
use crate::deliver::{DeliveryChannel, channels_from_config};
use crate::exec::RealLauncher;
use crate::fs::RealLogStore;
use crate::orchestrator::Orchestrator;
use crate::report::EnvSnapshot;

const UNKNOWN_HOSTNAME: &str = "<unknown hostname>";

/// Product name and version, used as the mail user agent and HTTP
/// `User-Agent`.
pub fn product_identifier() -> String {
    format!("{} / {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config file loading and resolution
/// - the real process launcher and log store
/// - the delivery channels
/// - the orchestrator, printing to stdout
pub async fn run(args: CliArgs) -> Result<()> {
    let hostname = match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(err) => {
            warn!(error = %err, "could not determine hostname");
            UNKNOWN_HOSTNAME.to_string()
        }
    };

    let file = load_optional(args.config.as_deref())?;
    let resolved = config::resolve(&args, &file, &hostname)?;
    let channels = channels_from_config(&resolved.delivery);
    debug!(channels = ?channels.iter().map(|c| c.name()).collect::<Vec<_>>(), "delivery channels");
    let log_store = RealLogStore::new(resolved.log.owner);
    let mut orchestrator = Orchestrator::new(
        RealLauncher,
        Box::new(log_store),
        EnvSnapshot::capture(hostname),
    )
    .with_channels(channels)
    .with_heartbeat(resolved.delivery.success_notify_url.clone())
    .with_log_dir(resolved.log.dir.clone());

    let mut stdout = std::io::stdout();
    let summary = orchestrator
        .execute(&resolved.policy, resolved.warnings, &mut stdout)
        .await?;

    info!(
        job = %summary.outcome.job_name,
        status = %summary.outcome.status(),
        attempts = summary.outcome.attempts,
        delivery_errors = summary.delivery_errors.len(),
        "invocation finished"
    );
    Ok(())
}
