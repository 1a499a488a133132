use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::judges::atcoder::{self, AtCoderJudge};
use crate::judges::codeforces::{self, CodeforcesJudge};
use crate::judges::provider::Judge;
use crate::services::atcoder::AtCoderClient;
use crate::services::codeforces::CodeforcesClient;
use crate::services::http::JsonFetcher;
use crate::services::rate_limit::RateLimiter;
use crate::services::Endpoints;

/// Service names accepted in the `users` section of the config file.
pub const KNOWN_SERVICES: [&str; 2] = [atcoder::SERVICE_NAME, codeforces::SERVICE_NAME];

/// Judges for this run, keyed by service name.
#[derive(Default)]
pub struct JudgeRegistry {
    judges: BTreeMap<String, Box<dyn Judge + Send + Sync>>,
}

impl JudgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a judge for every requested service, fetching its metadata.
    ///
    /// Unknown names are rejected before any request goes out.
    pub async fn connect<'a>(
        services: impl IntoIterator<Item = &'a str>,
        endpoints: &Endpoints,
        limiter: Arc<dyn RateLimiter + Send + Sync>,
    ) -> AppResult<Self> {
        let services: Vec<&str> = services.into_iter().collect();
        if let Some(unknown) = services.iter().find(|s| !KNOWN_SERVICES.contains(*s)) {
            return Err(AppError::Config(format!("unknown service '{}'", unknown)));
        }

        let fetcher = JsonFetcher::new(limiter);
        let mut registry = Self::new();

        for service in services {
            if registry.judges.contains_key(service) {
                continue;
            }
            tracing::info!("loading {} metadata", service);

            let judge: Box<dyn Judge + Send + Sync> = match service {
                atcoder::SERVICE_NAME => Box::new(
                    AtCoderJudge::connect(AtCoderClient::new(
                        endpoints.atcoder.clone(),
                        fetcher.clone(),
                    ))
                    .await?,
                ),
                codeforces::SERVICE_NAME => Box::new(
                    CodeforcesJudge::connect(CodeforcesClient::new(
                        endpoints.codeforces.clone(),
                        fetcher.clone(),
                    ))
                    .await?,
                ),
                other => return Err(AppError::Config(format!("unknown service '{}'", other))),
            };
            registry.register(judge);
        }

        Ok(registry)
    }

    pub fn register(&mut self, judge: Box<dyn Judge + Send + Sync>) {
        self.judges.insert(judge.service_name().to_string(), judge);
    }

    pub fn get(&self, service: &str) -> AppResult<&(dyn Judge + Send + Sync)> {
        self.judges
            .get(service)
            .map(|judge| judge.as_ref())
            .ok_or_else(|| AppError::Config(format!("no judge loaded for service '{}'", service)))
    }

    pub fn len(&self) -> usize {
        self.judges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.judges.is_empty()
    }
}
