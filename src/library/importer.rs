//! Drop-in library import.
//!
//! Opens the archive, reads its manifest, and only then transfers content
//! into the store. The archive handle lives for the duration of one call
//! and is released on every return path.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use thiserror::Error;
use tracing::{info, instrument};
use zip::ZipArchive;

use super::descriptor::LibraryDescriptor;
use super::manifest::{read_manifest, ManifestError};
use super::transfer::{transfer_assets, TransferStats};
use crate::store::{ContentStore, StoreError};

/// File extension of drop-in library archives
pub const DROP_IN_LIBRARY_EXTENSION: &str = "mtlib";

/// Errors that abort an import
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to open library archive {archive}: {source}")]
    OpenArchive {
        archive: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing library.json in {archive}")]
    MissingManifest { archive: String },

    #[error("Malformed library.json in {archive}: {source}")]
    MalformedManifest {
        archive: String,
        #[source]
        source: ManifestError,
    },

    #[error("Failed to read {entry} from {archive}: {source}")]
    ArchiveRead {
        archive: String,
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Content store error: {0}")]
    Store(#[from] StoreError),
}

/// Whether a path names a drop-in library archive
pub fn is_drop_in_library(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DROP_IN_LIBRARY_EXTENSION))
}

/// Import the library archive at `path` into `store`.
pub fn import_library(
    path: &Path,
    store: &dyn ContentStore,
) -> Result<LibraryDescriptor, ImportError> {
    let archive_name = path.display().to_string();
    let file = File::open(path).map_err(|source| ImportError::OpenArchive {
        archive: archive_name.clone(),
        source,
    })?;

    import_from_reader(BufReader::new(file), &archive_name, store).map(|(library, _)| library)
}

/// Import a library from any seekable ZIP source.
///
/// `archive_name` is only used for diagnostics.
#[instrument(skip(reader, store))]
pub fn import_from_reader<R: Read + Seek>(
    reader: R,
    archive_name: &str,
    store: &dyn ContentStore,
) -> Result<(LibraryDescriptor, TransferStats), ImportError> {
    let mut archive = ZipArchive::new(reader).map_err(|e| ImportError::OpenArchive {
        archive: archive_name.to_string(),
        source: e.into(),
    })?;

    let manifest = read_manifest(&mut archive, archive_name)?;
    let (assets, stats) = transfer_assets(&mut archive, archive_name, &manifest.namespace, store)?;

    info!(
        namespace = %manifest.namespace,
        assets = stats.assets,
        inserted = stats.inserted,
        reused = stats.reused,
        "Imported drop-in library"
    );

    Ok((LibraryDescriptor::new(manifest, assets), stats))
}
