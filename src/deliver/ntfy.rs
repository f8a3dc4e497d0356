// src/deliver/ntfy.rs

use serde::Serialize;
use tracing::debug;

use super::http::{check_response, client, transport};
use super::{DeliveryChannel, DeliveryError, DeliveryFuture};
use crate::config::NtfyConfig;
use crate::report::Report;

const CHANNEL: &str = "ntfy";

/// JSON publish body accepted at the root of an ntfy server.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct NtfyMessage<'a> {
    pub topic: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub tags: &'a [String],
    pub priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NtfyChannel {
    cfg: NtfyConfig,
}

impl NtfyChannel {
    pub fn new(cfg: NtfyConfig) -> Self {
        Self { cfg }
    }

    pub fn message<'a>(&'a self, report: &'a Report) -> NtfyMessage<'a> {
        NtfyMessage {
            topic: &self.cfg.topic,
            title: &report.summary_line,
            message: &report.text,
            tags: &self.cfg.tags,
            priority: self.cfg.priority,
            email: self.cfg.email.as_deref(),
        }
    }

    async fn publish(&self, report: &Report) -> Result<(), DeliveryError> {
        let client = client(CHANNEL, self.timeout())?;
        let mut request = client.post(self.cfg.server.clone()).json(&self.message(report));
        if let Some(token) = &self.cfg.access_token {
            request = request.bearer_auth(token);
        }

        debug!(server = %self.cfg.server, topic = %self.cfg.topic, "publishing to ntfy");
        let resp = request.send().await.map_err(|e| transport(CHANNEL, e))?;
        check_response(CHANNEL, resp).await
    }
}

impl DeliveryChannel for NtfyChannel {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    fn deliver<'a>(&'a self, report: &'a Report) -> DeliveryFuture<'a> {
        Box::pin(self.publish(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    #[test]
    fn optional_fields_are_omitted() {
        let channel = NtfyChannel::new(NtfyConfig {
            server: "https://ntfy.sh".parse().unwrap(),
            topic: "jobs".into(),
            tags: Vec::new(),
            priority: 3,
            email: None,
            access_token: None,
        });
        let report = Report {
            text: "body".into(),
            summary_line: "[h] Failed running x".into(),
            status: Status::Failed,
            log_file_name: "x.log".into(),
        };
        let json = serde_json::to_value(channel.message(&report)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "topic": "jobs",
                "title": "[h] Failed running x",
                "message": "body",
                "priority": 3,
            })
        );
    }
}
