//! Persistent content store on the local filesystem.
//!
//! Objects are staged in `tmp/` and moved into `objects/` with no-clobber
//! semantics, so the first writer of a key wins even across processes.
//! Metadata is committed before the object, so an object that exists always
//! has its sidecar.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use super::{ContentStore, PutOutcome, StoreError};
use crate::library::{Asset, AssetKey, AssetType, MediaType};

const OBJECTS_DIR: &str = "objects";
const TMP_DIR: &str = "tmp";

/// Metadata persisted next to each object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObjectInfo {
    pub key: AssetKey,
    pub name: String,
    pub asset_type: AssetType,
    pub media_type: MediaType,
    pub size: u64,
    pub stored_at: DateTime<Utc>,
}

/// Directory-backed content store
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(root.join(OBJECTS_DIR))?;
        fs::create_dir_all(root.join(TMP_DIR))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn shard_dir(&self, key: &AssetKey) -> PathBuf {
        self.root.join(OBJECTS_DIR).join(&key.as_str()[..2])
    }

    /// Path of the raw object bytes
    pub fn object_path(&self, key: &AssetKey) -> PathBuf {
        self.shard_dir(key).join(key.as_str())
    }

    fn info_path(&self, key: &AssetKey) -> PathBuf {
        self.shard_dir(key).join(format!("{}.json", key.as_str()))
    }

    /// Read the metadata of a stored object
    pub fn info(&self, key: &AssetKey) -> Result<Option<StoredObjectInfo>, StoreError> {
        let path = self.info_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stage bytes in `tmp/` and move them to `dest` unless it exists.
    ///
    /// Returns `false` when `dest` was already present.
    fn persist_new(&self, bytes: &[u8], dest: &Path) -> Result<bool, StoreError> {
        let mut staged = NamedTempFile::new_in(self.root.join(TMP_DIR))?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;

        match staged.persist_noclobber(dest) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.error.into()),
        }
    }
}

impl ContentStore for DiskStore {
    fn exists(&self, key: &AssetKey) -> Result<bool, StoreError> {
        Ok(self.object_path(key).is_file())
    }

    fn put(&self, asset: Asset) -> Result<PutOutcome, StoreError> {
        let key = asset.key().clone();
        let object_path = self.object_path(&key);
        if object_path.is_file() {
            debug!(%key, "Object already stored");
            return Ok(PutOutcome::AlreadyPresent);
        }
        fs::create_dir_all(self.shard_dir(&key))?;

        // The sidecar goes first; the object file is the commit marker.
        let info = StoredObjectInfo {
            key: key.clone(),
            name: asset.name().to_string(),
            asset_type: asset.asset_type(),
            media_type: asset.media_type().clone(),
            size: asset.size(),
            stored_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&info)?;
        if !self.persist_new(&json, &self.info_path(&key))? {
            // A concurrent writer, or one that died before committing the object.
            // Type, media type and size are derived from the same bytes either way.
            debug!(%key, "Metadata already present, keeping it");
        }

        if !self.persist_new(asset.data(), &object_path)? {
            debug!(%key, "Object already stored");
            return Ok(PutOutcome::AlreadyPresent);
        }

        Ok(PutOutcome::Inserted)
    }

    fn get(&self, key: &AssetKey) -> Result<Option<Asset>, StoreError> {
        let data = match fs::read(self.object_path(key)) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let actual = AssetKey::of(&data);
        if &actual != key {
            return Err(StoreError::DigestMismatch {
                key: key.clone(),
                actual,
            });
        }

        let info = self
            .info(key)?
            .ok_or_else(|| StoreError::MissingMetadata(key.clone()))?;

        Ok(Some(Asset::new(
            info.name,
            info.asset_type,
            info.media_type,
            data,
        )))
    }

    fn count(&self) -> Result<usize, StoreError> {
        let mut count = 0;
        for shard in fs::read_dir(self.root.join(OBJECTS_DIR))? {
            let shard = shard?;
            if !shard.file_type()?.is_dir() {
                continue;
            }
            for entry in fs::read_dir(shard.path())? {
                let entry = entry?;
                if AssetKey::parse(&entry.file_name().to_string_lossy()).is_some() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}
