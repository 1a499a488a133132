//! In-memory judge for tests.
//!
//! A snapshot is a JSON array of solved problem ids, e.g. `["a", "b"]`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::judges::delta::{collect_delta, parse_snapshot};
use crate::judges::provider::Judge;
use crate::judges::types::{DeltaEntry, ProblemId};

pub struct MockJudge {
    name: String,
    snapshots: HashMap<String, Value>,
    failing: Vec<String>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockJudge {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            snapshots: HashMap::new(),
            failing: Vec::new(),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_solved(mut self, handle: &str, solved: &[&str]) -> Self {
        self.snapshots.insert(handle.to_string(), json!(solved));
        self
    }

    pub fn with_error(mut self, handle: &str) -> Self {
        self.failing.push(handle.to_string());
        self
    }

    /// Handles passed to `fetch_snapshot`, in call order. Stays readable
    /// after the judge is boxed into a registry.
    pub fn fetch_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.fetched)
    }
}

#[async_trait]
impl Judge for MockJudge {
    fn service_name(&self) -> &str {
        &self.name
    }

    fn empty_snapshot(&self) -> Value {
        json!([])
    }

    async fn fetch_snapshot(&self, handle: &str) -> AppResult<Value> {
        self.fetched.lock().unwrap().push(handle.to_string());
        if self.failing.iter().any(|h| h == handle) {
            return Err(AppError::Network(format!("mock failure for {}", handle)));
        }
        Ok(self.snapshots.get(handle).cloned().unwrap_or_else(|| json!([])))
    }

    fn compute_delta(&self, old: &Value, new: &Value) -> AppResult<Vec<DeltaEntry>> {
        let old: Vec<String> = parse_snapshot(&self.name, "old", old)?;
        let new: Vec<String> = parse_snapshot(&self.name, "new", new)?;
        collect_delta(
            &new,
            &old,
            |id| Some(id.clone()),
            |id, _| {
                Ok(DeltaEntry {
                    problem_id: ProblemId::AtCoder(id.clone()),
                    title: format!("{} {}", self.name, id),
                    url: format!("https://judge.test/{}/{}", self.name, id),
                    score: None,
                })
            },
        )
    }
}
