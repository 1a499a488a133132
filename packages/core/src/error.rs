use std::path::PathBuf;

use thiserror::Error;

/// Unified application error.
///
/// Every failure is fatal for the run: nothing is retried, and the process
/// exits non-zero so the external scheduler simply tries again next time.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    /// Transport failure or non-2xx status on a GET or POST.
    #[error("Network error: {0}")]
    Network(String),

    /// A Codeforces envelope whose `status` is not `"OK"`.
    #[error("API status error from {service}: {message}")]
    ApiStatus { service: String, message: String },

    /// A solved submission references a contest or problem the metadata
    /// does not know about.
    #[error("Metadata lookup error in {service}: unknown {kind} '{id}'")]
    MetadataLookup {
        service: String,
        kind: &'static str,
        id: String,
    },

    #[error("Cache file {} is corrupted: {source}", .path.display())]
    CacheCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn metadata_lookup(
        service: impl Into<String>,
        kind: &'static str,
        id: impl ToString,
    ) -> Self {
        Self::MetadataLookup {
            service: service.into(),
            kind,
            id: id.to_string(),
        }
    }
}
