//! Archive builders shared by the integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 1x1 transparent PNG
pub const ICON_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// An entry to place in a test archive
#[derive(Clone, Copy)]
pub enum Entry<'a> {
    File(&'a str, &'a [u8]),
    Dir(&'a str),
}

pub fn manifest_json(namespace: &str) -> String {
    format!(r#"{{"namespace": "{}", "name": "Test Library", "version": "1.0.0"}}"#, namespace)
}

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
}

/// Build a ZIP archive in memory; entries are stored uncompressed
pub fn build_archive(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        match entry {
            Entry::File(name, bytes) => {
                zip.start_file(*name, stored()).unwrap();
                zip.write_all(bytes).unwrap();
            }
            Entry::Dir(name) => {
                zip.add_directory(*name, stored()).unwrap();
            }
        }
    }

    zip.finish().unwrap().into_inner()
}

/// Build a library archive with a manifest for `namespace` plus `entries`
pub fn build_library(namespace: &str, entries: &[Entry<'_>]) -> Vec<u8> {
    let manifest = manifest_json(namespace);
    let mut all = vec![Entry::File("library.json", manifest.as_bytes())];
    all.extend_from_slice(entries);
    build_archive(&all)
}

/// Write archive bytes to `dir/name`
pub fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Flip the first byte of `needle` inside `haystack`
pub fn corrupt(haystack: &mut [u8], needle: &[u8]) {
    let pos = haystack
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("payload not found in archive");
    haystack[pos] ^= 0xFF;
}

/// Rewrite the compression method recorded for `name` in both the local
/// header and the central directory
pub fn set_compression_method(archive: &mut [u8], name: &str, method: u16) {
    const LOCAL: &[u8] = b"PK\x03\x04";
    const CENTRAL: &[u8] = b"PK\x01\x02";

    let mut patched = 0;
    let mut pos = 0;
    while pos + 46 <= archive.len() {
        let layout = match &archive[pos..pos + 4] {
            sig if sig == LOCAL => Some((8, 26, 30)),
            sig if sig == CENTRAL => Some((10, 28, 46)),
            _ => None,
        };
        if let Some((method_at, name_len_at, name_at)) = layout {
            let at = pos + name_len_at;
            let name_len = u16::from_le_bytes([archive[at], archive[at + 1]]) as usize;
            let start = pos + name_at;
            if archive.get(start..start + name_len) == Some(name.as_bytes()) {
                let at = pos + method_at;
                archive[at..at + 2].copy_from_slice(&method.to_le_bytes());
                patched += 1;
            }
        }
        pos += 1;
    }
    assert_eq!(patched, 2, "expected a local and a central header for {}", name);
}
