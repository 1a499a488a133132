use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::services::http::JsonFetcher;

pub const DEFAULT_BASE_URL: &str = "https://kenkoooo.com/atcoder/atcoder-api";

/// Client for the AtCoder Problems API.
#[derive(Clone)]
pub struct AtCoderClient {
    base_url: String,
    fetcher: JsonFetcher,
}

impl AtCoderClient {
    pub fn new(base_url: String, fetcher: JsonFetcher) -> Self {
        Self { base_url, fetcher }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AtCoderContest {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AtCoderProblem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub point: Option<f64>,
}

/// One entry of `/results`. The payload carries more fields (language,
/// epoch, length...) which stay in the cached raw JSON untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct AtCoderResult {
    pub problem_id: String,
    pub contest_id: String,
    pub result: String,
}

impl AtCoderResult {
    pub fn is_accepted(&self) -> bool {
        self.result == "AC"
    }
}

impl AtCoderClient {
    pub async fn fetch_contests(&self) -> AppResult<Vec<AtCoderContest>> {
        let url = format!("{}/info/contests", self.base_url);
        let payload = self.fetcher.get_json(&url, &[]).await?;
        decode(&url, payload)
    }

    pub async fn fetch_problems(&self) -> AppResult<Vec<AtCoderProblem>> {
        let url = format!("{}/info/merged-problems", self.base_url);
        let payload = self.fetcher.get_json(&url, &[]).await?;
        decode(&url, payload)
    }

    /// Raw `/results` payload for `user_id`, suitable for caching verbatim.
    pub async fn fetch_results(&self, user_id: &str) -> AppResult<Value> {
        let url = format!("{}/results", self.base_url);
        self.fetcher.get_json(&url, &[("user", user_id)]).await
    }
}

fn decode<T: for<'de> Deserialize<'de>>(url: &str, payload: Value) -> AppResult<T> {
    serde_json::from_value(payload).map_err(|err| AppError::Parse(format!("{}: {}", url, err)))
}
