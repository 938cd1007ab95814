use std::path::PathBuf;

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Typed error for the store backends and collections.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Malformed value under key '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported schema version {found} under key '{key}' (supported: {supported})")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },

    #[error("Quota exceeded: {requested} bytes requested, quota is {quota} bytes")]
    QuotaExceeded { requested: usize, quota: usize },

    #[error("Concurrent modification of '{key}' (gave up after {attempts} attempts)")]
    Conflict { key: String, attempts: usize },

    #[error("Store file '{}' is corrupt: {source}", path.display())]
    CorruptFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn malformed(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            key: key.into(),
            source,
        }
    }

    pub fn serialize(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialize {
            key: key.into(),
            source,
        }
    }
}
