// src/deliver/discord.rs

use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::http::{check_response, client, transport};
use super::{DeliveryChannel, DeliveryError, DeliveryFuture};
use crate::config::DiscordConfig;
use crate::report::Report;

const CHANNEL: &str = "discord";

/// Posts the headline as message content and attaches the full report as a
/// file named after the run's log file.
#[derive(Debug, Clone)]
pub struct DiscordChannel {
    cfg: DiscordConfig,
}

impl DiscordChannel {
    pub fn new(cfg: DiscordConfig) -> Self {
        Self { cfg }
    }

    fn form(report: &Report) -> Result<Form, DeliveryError> {
        let file = Part::bytes(report.text.clone().into_bytes())
            .file_name(report.log_file_name.clone())
            .mime_str("text/plain")
            .map_err(|e| DeliveryError::Payload {
                channel: CHANNEL,
                message: format!("attaching log file: {e}"),
            })?;
        Ok(Form::new()
            .text("content", report.headline())
            .part("files[0]", file))
    }

    async fn post(&self, report: &Report) -> Result<(), DeliveryError> {
        let client = client(CHANNEL, self.timeout())?;
        let form = Self::form(report)?;

        debug!(file = %report.log_file_name, "posting Discord webhook");
        let resp = client
            .post(&self.cfg.webhook_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(CHANNEL, e))?;
        check_response(CHANNEL, resp).await
    }
}

impl DeliveryChannel for DiscordChannel {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    fn deliver<'a>(&'a self, report: &'a Report) -> DeliveryFuture<'a> {
        Box::pin(self.post(report))
    }
}
