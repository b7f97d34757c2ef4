//! The in-memory description of an imported library.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::asset::{AssetKey, AssetType};
use super::manifest::Manifest;

/// Where an archive path's content lives in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub key: AssetKey,
    pub asset_type: AssetType,
}

/// Archive-relative content path to stored asset
pub type PathAssetMap = BTreeMap<String, AssetRef>;

/// An imported drop-in library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDescriptor {
    manifest: Manifest,
    assets: PathAssetMap,
}

impl LibraryDescriptor {
    pub fn new(manifest: Manifest, assets: PathAssetMap) -> Self {
        Self { manifest, assets }
    }

    pub fn namespace(&self) -> &str {
        &self.manifest.namespace
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn assets(&self) -> &PathAssetMap {
        &self.assets
    }

    /// Look up the asset stored for an archive path (e.g. `content/icon.png`)
    pub fn asset_for(&self, path: &str) -> Option<&AssetRef> {
        self.assets.get(path)
    }
}
