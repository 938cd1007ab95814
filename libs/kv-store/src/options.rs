use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{FileStore, KeyValueStore, MemoryStore, Result};

/// Backend selection, as it appears under `storage:` in the app config.
///
/// ```yaml
/// storage:
///   backend: file
///   path: "data/smartutility.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreOptions {
    Memory {
        #[serde(default)]
        quota_bytes: Option<usize>,
    },
    File {
        path: PathBuf,
    },
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from("data/smartutility.json"),
        }
    }
}

/// Build a store from options. Relative file paths are resolved against `base_dir`.
pub fn build_store(opts: &StoreOptions, base_dir: &Path) -> Result<Arc<dyn KeyValueStore>> {
    match opts {
        StoreOptions::Memory { quota_bytes } => {
            info!(quota_bytes = ?quota_bytes, "Using in-memory store");
            let store = match quota_bytes {
                Some(q) => MemoryStore::with_quota(*q),
                None => MemoryStore::new(),
            };
            Ok(Arc::new(store))
        }
        StoreOptions::File { path } => {
            let resolved = if path.is_absolute() {
                path.clone()
            } else {
                base_dir.join(path)
            };
            info!(path = %resolved.display(), "Using file store");
            Ok(Arc::new(FileStore::open(resolved)?))
        }
    }
}
