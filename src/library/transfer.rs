//! Moves a library's content files into the content store.

use std::io::{Read, Seek};

use tracing::debug;
use zip::ZipArchive;

use super::asset::Asset;
use super::descriptor::{AssetRef, PathAssetMap};
use super::importer::ImportError;
use crate::store::{ContentStore, PutOutcome};

/// Folder holding every content file of a library
pub const CONTENT_PREFIX: &str = "content/";

/// Upper bound on buffer space reserved from an entry's declared size
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Counters from one transfer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Content entries processed
    pub assets: usize,

    /// Assets newly written to the store
    pub inserted: usize,

    /// Assets whose content was already stored
    pub reused: usize,
}

/// Store every file under `content/` and map its archive path to the stored key.
///
/// Assets are named `<namespace>/<entry path>`. Content already in the store
/// is not written again. A failed read aborts the transfer; assets stored
/// before the failure stay in the store.
pub fn transfer_assets<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    archive_name: &str,
    namespace: &str,
    store: &dyn ContentStore,
) -> Result<(PathAssetMap, TransferStats), ImportError> {
    let mut map = PathAssetMap::new();
    let mut stats = TransferStats::default();

    for index in 0..archive.len() {
        // Filter on the central directory name so ignored entries are never decoded
        let path = match archive.name_for_index(index) {
            Some(name) if name.starts_with(CONTENT_PREFIX) && !name.ends_with('/') => {
                name.to_string()
            }
            _ => continue,
        };

        let mut entry = archive
            .by_index(index)
            .map_err(|e| ImportError::ArchiveRead {
                archive: archive_name.to_string(),
                entry: path.clone(),
                source: e.into(),
            })?;

        let mut bytes = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| ImportError::ArchiveRead {
                archive: archive_name.to_string(),
                entry: path.clone(),
                source,
            })?;

        let asset = Asset::from_bytes(format!("{}/{}", namespace, path), &path, bytes);
        let asset_ref = AssetRef {
            key: asset.key().clone(),
            asset_type: asset.asset_type(),
        };

        stats.assets += 1;
        let outcome = if store.exists(&asset_ref.key)? {
            PutOutcome::AlreadyPresent
        } else {
            store.put(asset)?
        };

        match outcome {
            PutOutcome::Inserted => {
                stats.inserted += 1;
                debug!(
                    %path,
                    key = %asset_ref.key,
                    asset_type = %asset_ref.asset_type,
                    "Stored asset"
                );
            }
            PutOutcome::AlreadyPresent => {
                stats.reused += 1;
                debug!(%path, key = %asset_ref.key, "Asset already stored, skipping");
            }
        }

        map.insert(path, asset_ref);
    }

    Ok((map, stats))
}
