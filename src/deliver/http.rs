// src/deliver/http.rs

//! Shared HTTP plumbing for the webhook-style channels.

use std::time::Duration;

use super::DeliveryError;
use crate::product_identifier;

pub(crate) fn client(channel: &'static str, timeout: Duration) -> Result<reqwest::Client, DeliveryError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(product_identifier())
        .build()
        .map_err(|e| transport(channel, e))
}

pub(crate) fn transport(channel: &'static str, err: reqwest::Error) -> DeliveryError {
    DeliveryError::Transport {
        channel,
        message: format!("{:#}", anyhow::Error::from(err)),
    }
}

/// Turn a non-2xx response into a [`DeliveryError::Status`] carrying the body.
pub(crate) async fn check_response(
    channel: &'static str,
    resp: reqwest::Response,
) -> Result<(), DeliveryError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp
        .text()
        .await
        .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
    Err(DeliveryError::Status {
        channel,
        status: status.as_u16(),
        body,
    })
}
