// src/deliver/mod.rs

//! Delivery fan-out.
//!
//! Every configured channel implements [`DeliveryChannel`]. [`deliver_all`]
//! tries each one exactly once, in a fixed order, and collects failures
//! instead of stopping at the first one.
//!
//! - [`mail`]: SMTP via `lettre`.
//! - [`ntfy`]: JSON publish to an ntfy server.
//! - [`discord`]: multipart webhook with the report attached as a file.
//! - [`slack`]: JSON incoming webhook.
//! - [`heartbeat`]: the success ping, which is not part of the fan-out.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::DeliveryConfig;
use crate::report::Report;

pub mod discord;
pub mod heartbeat;
mod http;
pub mod mail;
pub mod ntfy;
pub mod slack;

pub use discord::DiscordChannel;
pub use heartbeat::notify_success;
pub use mail::MailChannel;
pub use ntfy::NtfyChannel;
pub use slack::SlackChannel;

/// Upper bound for a single channel, including connection setup.
pub const DEFAULT_CHANNEL_TIMEOUT: Duration = Duration::from_secs(10);

/// A failed delivery, always naming the channel it came from.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("{channel}: failed to build message: {message}")]
    Payload { channel: &'static str, message: String },

    #[error("{channel}: request failed: {message}")]
    Transport { channel: &'static str, message: String },

    #[error("{channel}: unexpected response (HTTP {status}): {body}")]
    Status {
        channel: &'static str,
        status: u16,
        body: String,
    },

    #[error("{channel}: timed out after {timeout:?}")]
    TimedOut {
        channel: &'static str,
        timeout: Duration,
    },
}

impl DeliveryError {
    pub fn channel(&self) -> &'static str {
        match self {
            DeliveryError::Payload { channel, .. }
            | DeliveryError::Transport { channel, .. }
            | DeliveryError::Status { channel, .. }
            | DeliveryError::TimedOut { channel, .. } => channel,
        }
    }
}

pub type DeliveryFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;

/// One way of getting a report in front of a human.
pub trait DeliveryChannel: Send + Sync {
    /// Short, stable identifier used in errors and logs.
    fn name(&self) -> &'static str;

    fn timeout(&self) -> Duration {
        DEFAULT_CHANNEL_TIMEOUT
    }

    fn deliver<'a>(&'a self, report: &'a Report) -> DeliveryFuture<'a>;
}

/// Build the channel list for a delivery config, in fan-out order:
/// mail, ntfy, discord, slack.
pub fn channels_from_config(cfg: &DeliveryConfig) -> Vec<Box<dyn DeliveryChannel>> {
    let mut channels: Vec<Box<dyn DeliveryChannel>> = Vec::new();
    if let Some(mail) = &cfg.mail {
        channels.push(Box::new(MailChannel::new(mail.clone())));
    }
    if let Some(ntfy) = &cfg.ntfy {
        channels.push(Box::new(NtfyChannel::new(ntfy.clone())));
    }
    if let Some(discord) = &cfg.discord {
        channels.push(Box::new(DiscordChannel::new(discord.clone())));
    }
    if let Some(slack) = &cfg.slack {
        channels.push(Box::new(SlackChannel::new(slack.clone())));
    }
    channels
}

/// Try every channel once, sequentially. Returns one error per failed
/// channel; an empty list means nothing failed.
pub async fn deliver_all(channels: &[Box<dyn DeliveryChannel>], report: &Report) -> Vec<DeliveryError> {
    let mut errors = Vec::new();

    for channel in channels {
        let timeout = channel.timeout();
        let result = match tokio::time::timeout(timeout, channel.deliver(report)).await {
            Ok(res) => res,
            Err(_) => Err(DeliveryError::TimedOut {
                channel: channel.name(),
                timeout,
            }),
        };

        match result {
            Ok(()) => info!(channel = channel.name(), "delivered"),
            Err(err) => {
                warn!(channel = channel.name(), error = %err, "delivery failed");
                errors.push(err);
            }
        }
    }

    errors
}
