//! Snapshot diffing shared by every judge.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::judges::types::DeltaEntry;

/// Diff two submission lists.
///
/// `solved_key` returns the problem key of an accepted submission and `None`
/// for anything else. Accepted submissions in `new` are keyed in order, so a
/// later submission for the same problem replaces an earlier one. Every key
/// accepted in `old` is then dropped. Entries come out sorted by key.
pub(crate) fn collect_delta<S, K, F, B>(
    new: &[S],
    old: &[S],
    solved_key: F,
    mut build_entry: B,
) -> AppResult<Vec<DeltaEntry>>
where
    K: Ord,
    F: Fn(&S) -> Option<K>,
    B: FnMut(&S, &K) -> AppResult<DeltaEntry>,
{
    let mut delta: BTreeMap<K, DeltaEntry> = BTreeMap::new();

    for submission in new {
        if let Some(key) = solved_key(submission) {
            let entry = build_entry(submission, &key)?;
            delta.insert(key, entry);
        }
    }

    for submission in old {
        if let Some(key) = solved_key(submission) {
            delta.remove(&key);
        }
    }

    Ok(delta.into_values().collect())
}

/// Decode a cached or freshly fetched payload into the judge's wire type.
pub(crate) fn parse_snapshot<'a, T: Deserialize<'a>>(
    service: &str,
    which: &str,
    payload: &'a Value,
) -> AppResult<T> {
    T::deserialize(payload)
        .map_err(|err| AppError::Parse(format!("{} {} snapshot: {}", service, which, err)))
}
