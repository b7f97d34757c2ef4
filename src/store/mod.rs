//! Content-addressable asset storage.
//!
//! The store is shared by every import in the process. It only ever grows:
//! [`ContentStore::put`] inserts an asset if its key is absent and leaves an
//! existing entry untouched otherwise, as one atomic step per key.
//!
//! # Implementations
//!
//! - [`MemoryStore`]: in-process map, used by tests and embedders
//! - [`DiskStore`]: persistent directory store
//!
//! ```text
//! <store>/
//! ├── objects/
//! │   └── <key[0..2]>/
//! │       ├── <key>        # raw asset bytes
//! │       └── <key>.json   # name, type, media type, size, stored_at
//! └── tmp/                 # staging area for in-flight writes
//! ```

pub mod disk;
pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::library::{Asset, AssetKey};

pub use disk::{DiskStore, StoredObjectInfo};
pub use memory::MemoryStore;

/// Errors raised by a content store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Object {key} digest mismatch (found {actual})")]
    DigestMismatch { key: AssetKey, actual: AssetKey },

    #[error("Object {0} has no metadata")]
    MissingMetadata(AssetKey),
}

/// Result of a [`ContentStore::put`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PutOutcome {
    /// The asset was written
    Inserted,

    /// An asset with the same key was already stored; nothing was written
    AlreadyPresent,
}

impl PutOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, PutOutcome::Inserted)
    }
}

/// Shared capability for storing assets by content hash
pub trait ContentStore: Send + Sync {
    /// Check whether an asset with this key is stored
    fn exists(&self, key: &AssetKey) -> Result<bool, StoreError>;

    /// Insert the asset unless its key is already present.
    ///
    /// Must be atomic per key: of several concurrent puts with the same key
    /// exactly one reports [`PutOutcome::Inserted`].
    fn put(&self, asset: Asset) -> Result<PutOutcome, StoreError>;

    /// Fetch a stored asset
    fn get(&self, key: &AssetKey) -> Result<Option<Asset>, StoreError>;

    /// Number of stored assets
    fn count(&self) -> Result<usize, StoreError>;
}

impl<S: ContentStore + ?Sized> ContentStore for std::sync::Arc<S> {
    fn exists(&self, key: &AssetKey) -> Result<bool, StoreError> {
        (**self).exists(key)
    }

    fn put(&self, asset: Asset) -> Result<PutOutcome, StoreError> {
        (**self).put(asset)
    }

    fn get(&self, key: &AssetKey) -> Result<Option<Asset>, StoreError> {
        (**self).get(key)
    }

    fn count(&self) -> Result<usize, StoreError> {
        (**self).count()
    }
}
