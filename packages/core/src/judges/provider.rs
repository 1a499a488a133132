//! Judge Interface
//!
//! One implementation per online judge. Metadata is fetched when the judge
//! is constructed; after that a judge only fetches per-user snapshots.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppResult;
use crate::judges::types::DeltaEntry;

#[async_trait]
pub trait Judge {
    /// Name used in the config file and as the cache subdirectory.
    fn service_name(&self) -> &str;

    /// What a user with no cached snapshot looks like.
    fn empty_snapshot(&self) -> Value;

    /// Fetch the user's current submissions as the raw API payload.
    async fn fetch_snapshot(&self, handle: &str) -> AppResult<Value>;

    /// Problems accepted in `new` that were not already accepted in `old`,
    /// sorted by problem id.
    fn compute_delta(&self, old: &Value, new: &Value) -> AppResult<Vec<DeltaEntry>>;
}
