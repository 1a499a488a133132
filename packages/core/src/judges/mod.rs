//! Judges
//!
//! Per-service submission fetching and the snapshot diff that turns two
//! submission lists into newly solved problems.

pub mod atcoder;
pub mod codeforces;
pub mod delta;
pub mod provider;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use provider::Judge;
pub use registry::{JudgeRegistry, KNOWN_SERVICES};
pub use types::*;
