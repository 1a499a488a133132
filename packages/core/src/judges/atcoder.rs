//! AtCoder judge.
//!
//! Titles and scores come from the static metadata fetched once at
//! construction; the per-user payload only carries ids and the result.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::judges::delta::{collect_delta, parse_snapshot};
use crate::judges::provider::Judge;
use crate::judges::types::{DeltaEntry, ProblemId, Score};
use crate::services::atcoder::{AtCoderClient, AtCoderContest, AtCoderProblem, AtCoderResult};

pub const SERVICE_NAME: &str = "atcoder";

/// Contest and problem tables, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct AtCoderMetadata {
    pub contests: HashMap<String, AtCoderContest>,
    pub problems: HashMap<String, AtCoderProblem>,
}

impl AtCoderMetadata {
    pub fn from_lists(contests: Vec<AtCoderContest>, problems: Vec<AtCoderProblem>) -> Self {
        Self {
            contests: contests.into_iter().map(|c| (c.id.clone(), c)).collect(),
            problems: problems.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }
}

pub struct AtCoderJudge {
    client: AtCoderClient,
    metadata: AtCoderMetadata,
}

impl AtCoderJudge {
    /// Fetch the contest and problem lists, then build the judge.
    pub async fn connect(client: AtCoderClient) -> AppResult<Self> {
        let contests = client.fetch_contests().await?;
        let problems = client.fetch_problems().await?;
        tracing::debug!(
            "atcoder metadata: {} contests, {} problems",
            contests.len(),
            problems.len()
        );

        Ok(Self::with_metadata(
            client,
            AtCoderMetadata::from_lists(contests, problems),
        ))
    }

    pub fn with_metadata(client: AtCoderClient, metadata: AtCoderMetadata) -> Self {
        Self { client, metadata }
    }

    pub fn metadata(&self) -> &AtCoderMetadata {
        &self.metadata
    }
}

pub fn problem_url(contest_id: &str, problem_id: &str) -> String {
    format!(
        "https://beta.atcoder.jp/contests/{}/tasks/{}",
        contest_id, problem_id
    )
}

/// Problems accepted in `new` but not in `old`, sorted by problem id.
pub fn compute_delta(
    old: &[AtCoderResult],
    new: &[AtCoderResult],
    metadata: &AtCoderMetadata,
) -> AppResult<Vec<DeltaEntry>> {
    collect_delta(
        new,
        old,
        |submission| submission.is_accepted().then(|| submission.problem_id.clone()),
        |submission, problem_id| {
            let contest = metadata
                .contests
                .get(&submission.contest_id)
                .ok_or_else(|| {
                    AppError::metadata_lookup(SERVICE_NAME, "contest", &submission.contest_id)
                })?;
            let problem = metadata
                .problems
                .get(problem_id)
                .ok_or_else(|| AppError::metadata_lookup(SERVICE_NAME, "problem", problem_id))?;

            Ok(DeltaEntry {
                problem_id: ProblemId::AtCoder(problem_id.clone()),
                title: format!("{} {}", contest.title, problem.title),
                url: problem_url(&submission.contest_id, problem_id),
                score: problem.point.map(Score),
            })
        },
    )
}

#[async_trait]
impl Judge for AtCoderJudge {
    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    fn empty_snapshot(&self) -> Value {
        json!([])
    }

    async fn fetch_snapshot(&self, handle: &str) -> AppResult<Value> {
        self.client.fetch_results(handle).await
    }

    fn compute_delta(&self, old: &Value, new: &Value) -> AppResult<Vec<DeltaEntry>> {
        let old: Vec<AtCoderResult> = parse_snapshot(SERVICE_NAME, "old", old)?;
        let new: Vec<AtCoderResult> = parse_snapshot(SERVICE_NAME, "new", new)?;
        compute_delta(&old, &new, &self.metadata)
    }
}
