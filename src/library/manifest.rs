//! The `library.json` manifest and its reader.

use std::io::{Read, Seek};

use serde::{Deserialize, Serialize};
use zip::result::ZipError;
use zip::ZipArchive;

use super::importer::ImportError;

/// Location of the manifest inside a library archive
pub const MANIFEST_PATH: &str = "library.json";

/// Parsed library manifest
///
/// Decoding is strict: unknown keys are rejected, and the namespace must be
/// present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// Namespace scoping the library's assets
    pub namespace: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub website: String,

    #[serde(default)]
    pub git_url: String,

    #[serde(default)]
    pub authors: Vec<String>,

    #[serde(default)]
    pub license: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub short_description: String,

    /// Whether library code may reach out to URLs
    #[serde(default)]
    pub allows_url_access: bool,

    /// Path of the read-me file inside the archive
    #[serde(default)]
    pub read_me_file: String,

    /// Path of the license file inside the archive
    #[serde(default)]
    pub license_file: String,
}

/// Reason a manifest failed to decode
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Namespace must not be empty")]
    EmptyNamespace,
}

impl Manifest {
    /// Decode a manifest from its JSON text
    pub fn from_json(text: &[u8]) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_slice(text)?;
        if manifest.namespace.trim().is_empty() {
            return Err(ManifestError::EmptyNamespace);
        }
        Ok(manifest)
    }
}

/// Locate and decode the manifest entry of an open archive.
pub fn read_manifest<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    archive_name: &str,
) -> Result<Manifest, ImportError> {
    let mut entry = match archive.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(ImportError::MissingManifest {
                archive: archive_name.to_string(),
            })
        }
        Err(e) => {
            return Err(ImportError::ArchiveRead {
                archive: archive_name.to_string(),
                entry: MANIFEST_PATH.to_string(),
                source: e.into(),
            })
        }
    };

    let mut text = Vec::new();
    entry
        .read_to_end(&mut text)
        .map_err(|e| ImportError::ArchiveRead {
            archive: archive_name.to_string(),
            entry: MANIFEST_PATH.to_string(),
            source: e,
        })?;

    Manifest::from_json(&text).map_err(|source| ImportError::MalformedManifest {
        archive: archive_name.to_string(),
        source,
    })
}
