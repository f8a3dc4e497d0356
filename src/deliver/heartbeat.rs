// src/deliver/heartbeat.rs

//! Success ping for push-style uptime monitors.

use super::DeliveryError;
use super::DEFAULT_CHANNEL_TIMEOUT;
use super::http::{client, transport};

const CHANNEL: &str = "success-notify";

/// GET `url` after a healthy run.
///
/// Uptime Kuma sometimes answers a push with a 404 "Duplicate entry" error
/// even though the heartbeat was recorded; that response counts as success.
pub async fn notify_success(url: &str) -> Result<(), DeliveryError> {
    let resp = client(CHANNEL, DEFAULT_CHANNEL_TIMEOUT)?
        .get(url)
        .send()
        .await
        .map_err(|e| transport(CHANNEL, e))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }

    let body = resp.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::NOT_FOUND && is_duplicate_entry(&body) {
        return Ok(());
    }
    Err(DeliveryError::Status {
        channel: CHANNEL,
        status: status.as_u16(),
        body,
    })
}

fn is_duplicate_entry(body: &str) -> bool {
    body.contains("ok\":false") && body.contains("Duplicate entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_uptime_kuma_duplicate_entry() {
        assert!(is_duplicate_entry(r#"{"ok":false,"msg":"Duplicate entry '1-2024' for key"}"#));
        assert!(!is_duplicate_entry(r#"{"ok":false,"msg":"Monitor not found"}"#));
    }
}
