//! Core data types for solved-problem deltas

use std::fmt;

/// Identity of a problem within one judge.
///
/// Codeforces has no global problem id, so its key is the pair
/// (contest id, problem index). The derived ordering is the report order:
/// AtCoder ids compare as strings, Codeforces keys by contest id then index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProblemId {
    AtCoder(String),
    Codeforces { contest_id: u64, index: String },
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemId::AtCoder(id) => write!(f, "{}", id),
            ProblemId::Codeforces { contest_id, index } => write!(f, "{}{}", contest_id, index),
        }
    }
}

/// Point value of a problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score(pub f64);

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Both APIs send points as JSON numbers; 100.0 should read "100".
        if self.0.is_finite() && self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A problem accepted in the new snapshot that was not already accepted in
/// the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaEntry {
    pub problem_id: ProblemId,
    pub title: String,
    pub url: String,
    pub score: Option<Score>,
}
