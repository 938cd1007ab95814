//! Typed JSON views over raw store keys.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{KeyValueStore, Result, StorageError};

/// Version tag written into every collection envelope.
pub const SCHEMA_VERSION: u32 = 1;

const MAX_CAS_ATTEMPTS: usize = 16;

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
struct EnvelopeIn {
    version: u32,
    items: serde_json::Value,
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<Vec<T>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| StorageError::malformed(key, e))?;

    // Unversioned layout: a bare array.
    if value.is_array() {
        return serde_json::from_value(value).map_err(|e| StorageError::malformed(key, e));
    }

    let envelope: EnvelopeIn =
        serde_json::from_value(value).map_err(|e| StorageError::malformed(key, e))?;
    if envelope.version > SCHEMA_VERSION {
        return Err(StorageError::UnsupportedVersion {
            key: key.to_string(),
            found: envelope.version,
            supported: SCHEMA_VERSION,
        });
    }
    serde_json::from_value(envelope.items).map_err(|e| StorageError::malformed(key, e))
}

fn encode<T: Serialize>(key: &str, items: &[T]) -> Result<String> {
    serde_json::to_string(&EnvelopeOut {
        version: SCHEMA_VERSION,
        items,
    })
    .map_err(|e| StorageError::serialize(key, e))
}

/// A `Vec<T>` persisted under a single key.
///
/// Reads through [`load`](Self::load) never fail: an unreadable value is
/// logged and treated as an empty collection. Writes go through
/// [`modify`](Self::modify), a read-modify-write loop over the store's
/// compare-and-swap, and fail on any storage error, including a stored value
/// that does not decode.
pub struct JsonCollection<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonCollection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonCollection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Strict read: surfaces malformed values as errors.
    pub fn try_load(&self) -> Result<Vec<T>> {
        match self.store.get(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) => decode(&self.key, &raw),
        }
    }

    /// Recovering read: any error yields an empty collection.
    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(items) => items,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Treating unreadable collection as empty");
                Vec::new()
            }
        }
    }

    /// Apply `f` to the current items and write the result back.
    ///
    /// `f` may run more than once if another writer changed the key in between.
    /// A stored value that fails to decode is left untouched and reported.
    pub fn modify<R>(&self, mut f: impl FnMut(&mut Vec<T>) -> R) -> Result<R> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let raw = self.store.get(&self.key)?;
            let mut items = match raw.as_deref() {
                None => Vec::new(),
                Some(r) => decode(&self.key, r).inspect_err(|e| {
                    warn!(key = %self.key, error = %e, "Refusing to write over unreadable collection");
                })?,
            };

            let out = f(&mut items);
            let encoded = encode(&self.key, &items)?;

            if self
                .store
                .compare_and_swap(&self.key, raw.as_deref(), Some(&encoded))?
            {
                return Ok(out);
            }
            debug!(key = %self.key, attempt, "Collection changed concurrently, retrying");
        }

        Err(StorageError::Conflict {
            key: self.key.clone(),
            attempts: MAX_CAS_ATTEMPTS,
        })
    }
}

/// A single JSON value persisted under one key (no envelope).
pub struct JsonSlot<T> {
    store: Arc<dyn KeyValueStore>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonSlot<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn try_load(&self) -> Result<Option<T>> {
        match self.store.get(&self.key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::malformed(&self.key, e)),
        }
    }

    pub fn load(&self) -> Option<T> {
        match self.try_load() {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Treating unreadable value as absent");
                None
            }
        }
    }

    pub fn save(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::serialize(&self.key, e))?;
        self.store.set(&self.key, &raw)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(&self.key)
    }
}
