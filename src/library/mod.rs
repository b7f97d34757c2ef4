//! Drop-in library import.
//!
//! A drop-in library is a ZIP archive (`.mtlib`) with a manifest and a
//! content folder:
//!
//! ```text
//! dice.mtlib
//! ├── library.json      # namespace + metadata
//! └── content/
//!     ├── icon.png
//!     └── macros/roll.js
//! ```
//!
//! Importing reads the manifest, stores every content file in a
//! [`ContentStore`](crate::store::ContentStore) keyed by its SHA-256, and
//! returns a [`LibraryDescriptor`] mapping each content path to its key.

pub mod asset;
pub mod descriptor;
pub mod importer;
pub mod manifest;
pub mod transfer;

pub use asset::{detect_media_type, Asset, AssetKey, AssetType, MediaType};
pub use descriptor::{AssetRef, LibraryDescriptor, PathAssetMap};
pub use importer::{
    import_from_reader, import_library, is_drop_in_library, ImportError,
    DROP_IN_LIBRARY_EXTENSION,
};
pub use manifest::{read_manifest, Manifest, ManifestError, MANIFEST_PATH};
pub use transfer::{transfer_assets, TransferStats, CONTENT_PREFIX};
