//! Slack integration -- post award announcements via `chat.postMessage`.

use reqwest::blocking::Client;
use serde_json::json;

use crate::error::NotificationError;
use crate::integrations::traits::Notifier;

const SLACK_API_BASE: &str = "https://slack.com/api";

pub struct SlackNotifier {
    token: String,
    base_url: String,
    client: Client,
}

impl SlackNotifier {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, SLACK_API_BASE)
    }

    /// Point the notifier at a different API root. Tests use this to talk
    /// to a local mock server.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into(),
            client: Client::new(),
        }
    }
}

impl Notifier for SlackNotifier {
    fn send_message(&self, channel: &str, text: &str) -> Result<(), NotificationError> {
        let body = json!({
            "channel": channel,
            "text": text,
        });

        let delivery_failed = |message: String| NotificationError::DeliveryFailed {
            channel: channel.to_string(),
            message,
        };

        let resp = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&body)
            .send()
            .map_err(|e| delivery_failed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(delivery_failed(format!("HTTP {}", resp.status())));
        }

        // Slack reports most failures as 200 with an error body
        let body: serde_json::Value = resp.json().map_err(|e| delivery_failed(e.to_string()))?;
        if body.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let err = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return Err(NotificationError::Rejected(err.to_string()));
        }

        Ok(())
    }
}
