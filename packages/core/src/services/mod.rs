//! Thin HTTP clients for the judge APIs.
//!
//! These only know URLs and wire shapes; turning payloads into solved
//! problems happens in [`crate::judges`].

pub mod atcoder;
pub mod codeforces;
pub mod http;
pub mod rate_limit;

/// Base URLs of the judge APIs. Overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub atcoder: String,
    pub codeforces: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            atcoder: atcoder::DEFAULT_BASE_URL.to_string(),
            codeforces: codeforces::DEFAULT_BASE_URL.to_string(),
        }
    }
}
