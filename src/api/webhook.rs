use reqwest::Client;
use serde::Serialize;

use crate::errors::{NotifyError, Result};

/// JSON document Slack-style incoming webhooks accept inside the `payload`
/// form field.
#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    channel: &'a str,
    username: &'a str,
    text: &'a str,
}

pub struct WebhookClient {
    client: Client,
    webhook_url: String,
}

impl WebhookClient {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    /// Posts one chat message. The body is a url-encoded form with a single
    /// `payload` field carrying the JSON document. No retries.
    pub async fn post_message(&self, channel: &str, username: &str, text: &str) -> Result<()> {
        let payload = serde_json::to_string(&MessagePayload {
            channel,
            username,
            text,
        })?;

        let response = self
            .client
            .post(&self.webhook_url)
            .form(&[("payload", payload.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::WebhookStatus(status, body));
        }

        Ok(())
    }
}
