//! droplib - Drop-in library importer
//!
//! Imports packaged drop-in libraries (`.mtlib` ZIP archives) into a
//! content-addressable asset store, deduplicating assets by content hash.
//!
//! # Architecture
//!
//! Import runs in two phases over one archive:
//! - The manifest (`library.json`) is read and decoded first; a missing or
//!   malformed manifest aborts before anything is stored
//! - Every file under `content/` is sniffed, classified, hashed, and put
//!   into the shared [`ContentStore`] unless its content is already there
//!
//! The result is a [`LibraryDescriptor`]: the manifest plus a map from
//! content path to stored asset key.
//!
//! # Modules
//!
//! - `library`: Manifest reader, asset transfer, import orchestration
//! - `store`: Content store trait with memory and disk implementations
//! - `config`: Path configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Import libraries into the configured store
//! droplib import dice.mtlib maps/
//!
//! # Look at a manifest without importing
//! droplib inspect dice.mtlib
//! ```

pub mod cli;
pub mod config;
pub mod library;
pub mod store;

// Re-export main types at crate root for convenience
pub use library::{
    import_library, Asset, AssetKey, AssetRef, AssetType, ImportError, LibraryDescriptor,
    Manifest, MediaType, PathAssetMap,
};
pub use store::{ContentStore, DiskStore, MemoryStore, PutOutcome, StoreError};
