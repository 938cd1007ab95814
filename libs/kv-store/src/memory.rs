use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{KeyValueStore, Result, StorageError};

/// In-process store backed by a `HashMap`.
///
/// An optional quota bounds the total size (keys plus values, in bytes) so that
/// callers can exercise the "storage full" path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        footprint(&self.entries.read())
    }

    fn check_quota(&self, entries: &HashMap<String, String>, key: &str, value: &str) -> Result<()> {
        let Some(quota) = self.quota_bytes else {
            return Ok(());
        };
        let current = footprint(entries);
        let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
        let requested = current - replaced + key.len() + value.len();
        if requested > quota {
            return Err(StorageError::QuotaExceeded { requested, quota });
        }
        Ok(())
    }
}

fn footprint(entries: &HashMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        self.check_quota(&entries, key, value)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> Result<bool> {
        let mut entries = self.entries.write();
        if entries.get(key).map(String::as_str) != expected {
            return Ok(false);
        }
        match new {
            Some(value) => {
                self.check_quota(&entries, key, value)?;
                entries.insert(key.to_string(), value.to_string());
            }
            None => {
                entries.remove(key);
            }
        }
        Ok(true)
    }
}
