//! On-disk snapshot cache.
//!
//! One JSON file per (service, user) under `<root>/<service>/<user>.json`,
//! holding the judge payload exactly as it was fetched. A write replaces the
//! previous snapshot wholesale.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{AppError, AppResult};

pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, service: &str, user_id: &str) -> PathBuf {
        self.root
            .join(cache_key(service))
            .join(format!("{}.json", cache_key(user_id)))
    }

    /// Returns the last written snapshot, or `None` when nothing was cached
    /// yet (a missing cache directory counts as nothing cached).
    pub fn read(&self, service: &str, user_id: &str) -> AppResult<Option<Value>> {
        let path = self.path_for(service, user_id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AppError::io(path, err)),
        };

        tracing::info!("read cache file: {}", path.display());
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| AppError::CacheCorruption { path, source })
    }

    /// Overwrites the snapshot for `(service, user_id)`.
    ///
    /// The payload goes to a sibling temp file first and is renamed into
    /// place, so readers never observe a half-written snapshot.
    pub fn write(&self, service: &str, user_id: &str, snapshot: &Value) -> AppResult<()> {
        let path = self.path_for(service, user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| AppError::io(parent, err))?;
        }

        let body = serde_json::to_vec(snapshot)
            .map_err(|err| AppError::Parse(format!("cannot serialise snapshot: {}", err)))?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|err| AppError::io(&tmp, err))?;
        fs::rename(&tmp, &path).map_err(|err| AppError::io(&path, err))?;

        tracing::info!("write cache file: {}", path.display());
        Ok(())
    }
}

/// Maps an arbitrary id onto a single safe path component.
///
/// Bytes outside `[A-Za-z0-9._-]` become `%XX`, and so does every dot of an
/// all-dot id. `%` itself is always escaped, so distinct ids never share a
/// file. Real AtCoder and Codeforces handles pass through unchanged.
fn cache_key(raw: &str) -> String {
    let all_dots = raw.bytes().all(|b| b == b'.');
    let mut key = String::with_capacity(raw.len());

    for byte in raw.bytes() {
        let plain = byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.');
        if plain && !(all_dots && byte == b'.') {
            key.push(char::from(byte));
        } else {
            key.push_str(&format!("%{:02X}", byte));
        }
    }
    key
}

/// Fresh directory path under the system temp dir; not created.
#[cfg(test)]
pub(crate) fn scratch_dir(label: &str) -> PathBuf {
    let suffix: u64 = rand::random();
    std::env::temp_dir().join(format!("shoujin-{}-{:016x}", label, suffix))
}
