use crate::domain::model::{DeliveryReceipt, WebhookPayload};
use crate::utils::error::{PushError, Result};
use std::time::Duration;

pub const USER_AGENT: &str = "Theme-Pusher/1.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One delivery attempt: a JSON POST bounded by a per-request timeout.
#[derive(Debug, Clone)]
pub struct WebhookSender {
    client: reqwest::Client,
    timeout: Duration,
}

impl WebhookSender {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// Send the payload once. A 2xx response yields a receipt carrying the
    /// best-effort body (JSON when parseable, else wrapped raw text). Any
    /// non-2xx response and any transport problem come back as retryable
    /// errors.
    pub async fn send_once(&self, url: &str, payload: &WebhookPayload) -> Result<DeliveryReceipt> {
        tracing::debug!(url, "Sending webhook");

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.classify(e))?;
        tracing::debug!(status = status.as_u16(), "Webhook response: {}", text);

        if status.is_success() {
            let data = serde_json::from_str::<serde_json::Value>(&text)
                .unwrap_or_else(|_| serde_json::json!({ "text": text }));
            Ok(DeliveryReceipt::delivered(status.as_u16(), data))
        } else {
            Err(PushError::RemoteRejected {
                status: status.as_u16(),
                message: format!(
                    "{} - {}",
                    status.canonical_reason().unwrap_or("Unknown"),
                    text
                ),
            })
        }
    }

    fn classify(&self, e: reqwest::Error) -> PushError {
        let message = if e.is_timeout() {
            format!("Request timed out after {:?}", self.timeout)
        } else if e.is_connect() {
            format!("Connection failed: {e}")
        } else {
            format!("Request error: {e}")
        };
        PushError::Transport { message }
    }
}
