//! Key-value storage for SmartUtility.
//!
//! This crate provides the string-keyed store that stands in for a backend
//! database, plus typed JSON collections layered on top of it.
//!
//! # Backends
//! - [`MemoryStore`]: process-local map, with an optional byte quota
//! - [`FileStore`]: a single JSON document on disk, rewritten atomically
//!
//! # Collections
//! [`JsonCollection`] and [`JsonSlot`] keep the serialized representation an
//! implementation detail. Collections are written as a versioned envelope
//! (`{"version": 1, "items": [...]}`); bare JSON arrays are accepted on read.
//!
//! # Example
//! ```rust
//! use kv_store::{JsonCollection, KeyValueStore, MemoryStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
//! let numbers = JsonCollection::<u32>::new(store, "numbers");
//! numbers.modify(|items| items.insert(0, 7)).unwrap();
//! assert_eq!(numbers.load(), vec![7]);
//! ```

pub mod collection;
pub mod error;
pub mod file;
pub mod memory;
pub mod options;

pub use collection::{JsonCollection, JsonSlot, SCHEMA_VERSION};
pub use error::{Result, StorageError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use options::{build_store, StoreOptions};

/// Synchronous string-keyed store.
///
/// Implementations must make `compare_and_swap` atomic with respect to every
/// other call on the same instance.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Replace the value under `key` with `new` only if the current value
    /// equals `expected` (`None` meaning "absent"). Passing `new = None`
    /// removes the key. Returns `false` when the current value did not match.
    fn compare_and_swap(&self, key: &str, expected: Option<&str>, new: Option<&str>)
        -> Result<bool>;
}
