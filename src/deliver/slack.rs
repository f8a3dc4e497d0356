// src/deliver/slack.rs

use serde::Serialize;

use super::http::{check_response, client, transport};
use super::{DeliveryChannel, DeliveryError, DeliveryFuture};
use crate::config::SlackConfig;
use crate::report::Report;

const CHANNEL: &str = "slack";

#[derive(Debug, Serialize)]
struct SlackPayload<'a> {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_emoji: Option<&'a str>,
}

/// Posts the headline to a Slack incoming webhook. Slack webhooks take no
/// attachments, so the full report is not sent.
#[derive(Debug, Clone)]
pub struct SlackChannel {
    cfg: SlackConfig,
}

impl SlackChannel {
    pub fn new(cfg: SlackConfig) -> Self {
        Self { cfg }
    }

    async fn post(&self, report: &Report) -> Result<(), DeliveryError> {
        let payload = SlackPayload {
            text: report.headline(),
            username: self.cfg.username.as_deref(),
            icon_emoji: self.cfg.icon_emoji.as_deref(),
        };
        let resp = client(CHANNEL, self.timeout())?
            .post(&self.cfg.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport(CHANNEL, e))?;
        check_response(CHANNEL, resp).await
    }
}

impl DeliveryChannel for SlackChannel {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    fn deliver<'a>(&'a self, report: &'a Report) -> DeliveryFuture<'a> {
        Box::pin(self.post(report))
    }
}
