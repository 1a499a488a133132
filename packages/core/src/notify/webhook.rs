//! Webhook delivery.
//!
//! Posts the rendered summary as `{"text": ...}`, the shape Slack-style
//! incoming webhooks accept. A non-2xx answer fails the run.

use reqwest::Client;
use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub text: &'a str,
}

#[derive(Clone)]
pub struct WebhookClient {
    url: String,
    http: Client,
}

impl WebhookClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: Client::new(),
        }
    }

    pub async fn post(&self, text: &str) -> AppResult<()> {
        tracing::info!("POST {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .json(&WebhookPayload { text })
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "webhook returned HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serialises_as_text_object() {
        let body = serde_json::to_value(WebhookPayload { text: "hello\nworld" }).unwrap();
        assert_eq!(body, serde_json::json!({"text": "hello\nworld"}));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let client = WebhookClient::new("http://127.0.0.1:9/hook".to_string());
        assert!(matches!(client.post("x").await, Err(AppError::Network(_))));
    }
}
