//! Asset records, content hash keys and media type classification.
//!
//! Every file under a library's `content/` folder becomes an [`Asset`]:
//! its bytes are hashed into an [`AssetKey`], sniffed into a [`MediaType`],
//! and mapped onto one of the fixed [`AssetType`] categories.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content hash key (lowercase hex SHA-256 of the asset bytes)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetKey(String);

impl AssetKey {
    /// Hash raw bytes into a key
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Parse a key from its hex form
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A detected media type such as `image/png`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl MediaType {
    pub const OCTET_STREAM: &'static str = "application/octet-stream";
    pub const TEXT_PLAIN: &'static str = "text/plain";

    pub fn new(essence: impl Into<String>) -> Self {
        Self(essence.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Top-level type (`image` for `image/png`)
    pub fn top_level(&self) -> &str {
        self.0.split('/').next().unwrap_or_default()
    }

    /// Subtype without parameters (`png` for `image/png`)
    pub fn subtype(&self) -> &str {
        self.0
            .split('/')
            .nth(1)
            .and_then(|s| s.split(';').next())
            .map(str::trim)
            .unwrap_or_default()
    }

    /// Whether the type describes human-readable text
    pub fn is_textual(&self) -> bool {
        let sub = self.subtype();
        self.top_level() == "text"
            || sub.ends_with("+json")
            || sub.ends_with("+xml")
            || matches!(
                sub,
                "json" | "javascript" | "x-javascript" | "ecmascript" | "xml"
            )
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Detect the media type of an asset from its bytes, using the path only as a hint.
///
/// Magic-byte signatures win. Content that reads as text is classified as
/// text even when the extension claims otherwise; the extension only
/// refines which textual type it is. Unrecognised binary content falls back
/// to the extension, then to `application/octet-stream`.
pub fn detect_media_type(path_hint: &str, bytes: &[u8]) -> MediaType {
    if let Some(kind) = infer::get(bytes) {
        return MediaType::new(kind.mime_type());
    }

    let guessed = mime_guess::from_path(Path::new(path_hint))
        .first()
        .map(|m| MediaType::new(m.essence_str()));

    if looks_like_text(bytes) {
        return match guessed {
            Some(media) if media.is_textual() => media,
            _ => MediaType::new(MediaType::TEXT_PLAIN),
        };
    }

    guessed.unwrap_or_else(|| MediaType::new(MediaType::OCTET_STREAM))
}

/// Non-empty UTF-8 without control characters other than common whitespace.
fn looks_like_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => !text
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\x0c' | '\x1b')),
        Err(_) => false,
    }
}

/// Closed set of asset categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Image,
    Audio,
    Html,
    Css,
    Javascript,
    Json,
    Markdown,
    Xml,
    /// Plain text or other textual data
    Text,
    /// Anything the table does not recognise
    Other,
}

impl AssetType {
    /// Map a media type onto its category
    pub fn from_media_type(media: &MediaType) -> Self {
        let sub = media.subtype();
        match (media.top_level(), sub) {
            ("image", _) => AssetType::Image,
            ("audio", _) => AssetType::Audio,
            ("text", "html") | ("application", "xhtml+xml") => AssetType::Html,
            ("text", "css") => AssetType::Css,
            ("text" | "application", "javascript" | "x-javascript" | "ecmascript") => {
                AssetType::Javascript
            }
            ("text" | "application", "markdown" | "x-markdown") => AssetType::Markdown,
            (_, "json") => AssetType::Json,
            (_, s) if s.ends_with("+json") => AssetType::Json,
            (_, "xml") => AssetType::Xml,
            (_, s) if s.ends_with("+xml") => AssetType::Xml,
            ("text", _) => AssetType::Text,
            _ => AssetType::Other,
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssetType::Image => "image",
            AssetType::Audio => "audio",
            AssetType::Html => "html",
            AssetType::Css => "css",
            AssetType::Javascript => "javascript",
            AssetType::Json => "json",
            AssetType::Markdown => "markdown",
            AssetType::Xml => "xml",
            AssetType::Text => "text",
            AssetType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// An immutable asset ready for the content store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    key: AssetKey,
    name: String,
    asset_type: AssetType,
    media_type: MediaType,
    data: Vec<u8>,
}

impl Asset {
    /// Build an asset, hashing its bytes
    pub fn new(
        name: impl Into<String>,
        asset_type: AssetType,
        media_type: MediaType,
        data: Vec<u8>,
    ) -> Self {
        Self {
            key: AssetKey::of(&data),
            name: name.into(),
            asset_type,
            media_type,
            data,
        }
    }

    /// Detect, classify and build an asset in one step
    pub fn from_bytes(name: impl Into<String>, path_hint: &str, data: Vec<u8>) -> Self {
        let media_type = detect_media_type(path_hint, &data);
        let asset_type = AssetType::from_media_type(&media_type);
        Self::new(name, asset_type, media_type, data)
    }

    pub fn key(&self) -> &AssetKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
