use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::services::http::JsonFetcher;

pub const DEFAULT_BASE_URL: &str = "https://codeforces.com/api";

const SERVICE: &str = "codeforces";

/// Client for the public Codeforces API.
/// Codeforces documentation: https://codeforces.com/apiHelp
#[derive(Clone)]
pub struct CodeforcesClient {
    base_url: String,
    fetcher: JsonFetcher,
}

impl CodeforcesClient {
    pub fn new(base_url: String, fetcher: JsonFetcher) -> Self {
        Self { base_url, fetcher }
    }
}

/// Every Codeforces response is wrapped as `{status, comment?, result?}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CfContest {
    pub id: u64,
    pub name: String,
}

/// A Submission object. Only the fields the delta needs are decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CfSubmission {
    /// Absent for problemset-only submissions (acmsguru and the like).
    #[serde(default)]
    pub contest_id: Option<u64>,
    pub problem: CfProblem,
    /// Absent while the submission is still being judged.
    #[serde(default)]
    pub verdict: Option<String>,
}

impl CfSubmission {
    pub fn is_accepted(&self) -> bool {
        self.verdict.as_deref() == Some("OK")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CfProblem {
    pub index: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub points: Option<f64>,
}

/// Fails unless the envelope reports `status == "OK"`.
pub fn check_status(payload: &Value) -> AppResult<()> {
    let envelope = Envelope::deserialize(payload)
        .map_err(|err| AppError::Parse(format!("codeforces envelope: {}", err)))?;

    if envelope.status == "OK" {
        return Ok(());
    }

    Err(AppError::ApiStatus {
        service: SERVICE.to_string(),
        message: match envelope.comment {
            Some(comment) => format!("status {}: {}", envelope.status, comment),
            None => format!("status {}", envelope.status),
        },
    })
}

impl CodeforcesClient {
    pub async fn fetch_contests(&self, gym: bool) -> AppResult<Vec<CfContest>> {
        let url = format!("{}/contest.list", self.base_url);
        let query: &[(&str, &str)] = if gym { &[("gym", "true")] } else { &[] };

        let mut payload = self.fetcher.get_json(&url, query).await?;
        check_status(&payload)?;

        let result = payload
            .get_mut("result")
            .map(Value::take)
            .ok_or_else(|| AppError::Parse(format!("{}: missing result", url)))?;
        serde_json::from_value(result).map_err(|err| AppError::Parse(format!("{}: {}", url, err)))
    }

    /// Raw `user.status` envelope for `handle`, suitable for caching verbatim.
    pub async fn fetch_user_status(&self, handle: &str) -> AppResult<Value> {
        let url = format!("{}/user.status", self.base_url);
        let payload = self.fetcher.get_json(&url, &[("handle", handle)]).await?;
        check_status(&payload)?;
        Ok(payload)
    }
}
