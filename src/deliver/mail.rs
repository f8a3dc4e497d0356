// src/deliver/mail.rs

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{DeliveryChannel, DeliveryError, DeliveryFuture};
use crate::config::MailConfig;
use crate::product_identifier;
use crate::report::Report;

const CHANNEL: &str = "mail";

/// Sends the report as a plain-text email.
///
/// Encryption follows the port: 465 is implicit TLS, 587 is STARTTLS,
/// anything else is plaintext.
#[derive(Debug, Clone)]
pub struct MailChannel {
    cfg: MailConfig,
}

impl MailChannel {
    pub fn new(cfg: MailConfig) -> Self {
        Self { cfg }
    }

    fn build_message(&self, report: &Report) -> Result<Message, DeliveryError> {
        let from: Mailbox = self
            .cfg
            .from
            .parse()
            .map_err(|e| payload(format!("invalid From address '{}': {e}", self.cfg.from)))?;
        let to: Mailbox = self
            .cfg
            .to
            .parse()
            .map_err(|e| payload(format!("invalid To address '{}': {e}", self.cfg.to)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(report.headline())
            .user_agent(product_identifier())
            .header(ContentType::TEXT_PLAIN)
            .body(mail_body(&report.text, self.cfg.tab_replacement.as_deref()))
            .map_err(|e| payload(e.to_string()))
    }

    async fn send(&self, report: &Report) -> Result<(), DeliveryError> {
        let message = self.build_message(report)?;
        let host = self.cfg.smtp_host.as_str();

        let builder = match self.cfg.smtp_port {
            465 => AsyncSmtpTransport::<Tokio1Executor>::relay(host).map_err(transport)?,
            587 => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).map_err(transport)?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };
        let mut builder = builder
            .port(self.cfg.smtp_port)
            .timeout(Some(self.timeout()));
        if !self.cfg.smtp_user.is_empty() || !self.cfg.smtp_password.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.cfg.smtp_user.clone(),
                self.cfg.smtp_password.clone(),
            ));
        }

        debug!(host, port = self.cfg.smtp_port, to = %self.cfg.to, "sending mail");
        builder
            .build()
            .send(message)
            .await
            .map_err(|e| DeliveryError::Transport {
                channel: CHANNEL,
                message: format!("failed to send email to {}: {e}", self.cfg.to),
            })?;
        Ok(())
    }
}

impl DeliveryChannel for MailChannel {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    fn deliver<'a>(&'a self, report: &'a Report) -> DeliveryFuture<'a> {
        Box::pin(self.send(report))
    }
}

/// Mail body: CRLF line endings, tabs optionally replaced.
pub fn mail_body(text: &str, tab_replacement: Option<&str>) -> String {
    let body = text.replace("\r\n", "\n").replace('\n', "\r\n");
    match tab_replacement {
        Some(rep) if !rep.is_empty() => body.replace('\t', rep),
        _ => body,
    }
}

fn payload(message: String) -> DeliveryError {
    DeliveryError::Payload {
        channel: CHANNEL,
        message,
    }
}

fn transport(err: lettre::transport::smtp::Error) -> DeliveryError {
    DeliveryError::Transport {
        channel: CHANNEL,
        message: format!("failed to connect to SMTP server: {err}"),
    }
}
