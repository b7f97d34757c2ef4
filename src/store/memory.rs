//! In-process content store.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{ContentStore, PutOutcome, StoreError};
use crate::library::{Asset, AssetKey};

/// Content store backed by a locked map
#[derive(Debug, Default)]
pub struct MemoryStore {
    assets: RwLock<HashMap<AssetKey, Asset>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, in no particular order
    pub fn keys(&self) -> Vec<AssetKey> {
        self.assets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl ContentStore for MemoryStore {
    fn exists(&self, key: &AssetKey) -> Result<bool, StoreError> {
        let assets = self.assets.read().unwrap_or_else(PoisonError::into_inner);
        Ok(assets.contains_key(key))
    }

    fn put(&self, asset: Asset) -> Result<PutOutcome, StoreError> {
        let mut assets = self.assets.write().unwrap_or_else(PoisonError::into_inner);
        match assets.entry(asset.key().clone()) {
            Entry::Occupied(_) => Ok(PutOutcome::AlreadyPresent),
            Entry::Vacant(slot) => {
                slot.insert(asset);
                Ok(PutOutcome::Inserted)
            }
        }
    }

    fn get(&self, key: &AssetKey) -> Result<Option<Asset>, StoreError> {
        let assets = self.assets.read().unwrap_or_else(PoisonError::into_inner);
        Ok(assets.get(key).cloned())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.assets.read().unwrap_or_else(PoisonError::into_inner).len())
    }
}
