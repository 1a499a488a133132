use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::services::rate_limit::RateLimiter;

/// Rate-limited JSON GET shared by both judge clients.
#[derive(Clone)]
pub struct JsonFetcher {
    http: Client,
    limiter: Arc<dyn RateLimiter + Send + Sync>,
}

impl JsonFetcher {
    pub fn new(limiter: Arc<dyn RateLimiter + Send + Sync>) -> Self {
        Self {
            http: Client::new(),
            limiter,
        }
    }

    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        self.limiter.wait().await;

        tracing::info!("GET {} {:?}", url, query);
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| AppError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "GET {} returned HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| AppError::Parse(format!("GET {}: {}", url, err)))
    }
}
