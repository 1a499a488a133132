//! Codeforces judge.
//!
//! Problems are keyed by (contest id, index). Problem names and points are
//! embedded in each submission; only contest names come from metadata.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::judges::delta::{collect_delta, parse_snapshot};
use crate::judges::provider::Judge;
use crate::judges::types::{DeltaEntry, ProblemId, Score};
use crate::services::codeforces::{CfContest, CfSubmission, CodeforcesClient};

pub const SERVICE_NAME: &str = "codeforces";

/// The part of a `user.status` envelope the diff reads. `status` is not
/// required here because an empty cache is represented as `{"result": []}`.
#[derive(Debug, Deserialize)]
struct StatusSnapshot {
    #[serde(default)]
    result: Vec<CfSubmission>,
}

pub struct CodeforcesJudge {
    client: CodeforcesClient,
    contests: HashMap<u64, CfContest>,
}

/// Index regular and gym contests by id.
///
/// Gym contests are inserted second and silently replace a regular contest
/// with the same id. That precedence looks accidental but is kept as is.
pub fn merge_contests(regular: Vec<CfContest>, gym: Vec<CfContest>) -> HashMap<u64, CfContest> {
    let mut contests = HashMap::with_capacity(regular.len() + gym.len());
    contests.extend(regular.into_iter().map(|c| (c.id, c)));
    contests.extend(gym.into_iter().map(|c| (c.id, c)));
    contests
}

impl CodeforcesJudge {
    /// Fetch the regular and gym contest lists, then build the judge.
    pub async fn connect(client: CodeforcesClient) -> AppResult<Self> {
        let regular = client.fetch_contests(false).await?;
        let gym = client.fetch_contests(true).await?;
        tracing::debug!(
            "codeforces metadata: {} contests, {} gym contests",
            regular.len(),
            gym.len()
        );

        Ok(Self::with_contests(client, merge_contests(regular, gym)))
    }

    pub fn with_contests(client: CodeforcesClient, contests: HashMap<u64, CfContest>) -> Self {
        Self { client, contests }
    }

    pub fn contests(&self) -> &HashMap<u64, CfContest> {
        &self.contests
    }
}

pub fn problem_url(contest_id: u64, index: &str) -> String {
    format!("http://codeforces.com/contest/{}/problem/{}", contest_id, index)
}

/// Problems accepted in `new` but not in `old`, sorted by (contest id, index).
///
/// Rejected submissions are skipped without looking at their contest id. An
/// accepted submission in `new` without one is a parse error.
pub fn compute_delta(
    old: &[CfSubmission],
    new: &[CfSubmission],
    contests: &HashMap<u64, CfContest>,
) -> AppResult<Vec<DeltaEntry>> {
    collect_delta(
        new,
        old,
        |submission| {
            submission
                .is_accepted()
                .then(|| (submission.contest_id, submission.problem.index.clone()))
        },
        |submission, (contest_id, index)| {
            let contest_id = contest_id.ok_or_else(|| {
                AppError::Parse(format!(
                    "{}: accepted submission for problem {} has no contestId",
                    SERVICE_NAME, index
                ))
            })?;
            let contest = contests
                .get(&contest_id)
                .ok_or_else(|| AppError::metadata_lookup(SERVICE_NAME, "contest", contest_id))?;

            Ok(DeltaEntry {
                problem_id: ProblemId::Codeforces {
                    contest_id,
                    index: index.clone(),
                },
                title: format!("{}: {}", contest.name, submission.problem.name),
                url: problem_url(contest_id, index),
                score: submission.problem.points.map(Score),
            })
        },
    )
}

#[async_trait]
impl Judge for CodeforcesJudge {
    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    fn empty_snapshot(&self) -> Value {
        json!({ "result": [] })
    }

    async fn fetch_snapshot(&self, handle: &str) -> AppResult<Value> {
        self.client.fetch_user_status(handle).await
    }

    fn compute_delta(&self, old: &Value, new: &Value) -> AppResult<Vec<DeltaEntry>> {
        let old: StatusSnapshot = parse_snapshot(SERVICE_NAME, "old", old)?;
        let new: StatusSnapshot = parse_snapshot(SERVICE_NAME, "new", new)?;
        compute_delta(&old.result, &new.result, &self.contests)
    }
}
