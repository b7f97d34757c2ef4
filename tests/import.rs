//! Import Integration Tests
//!
//! Tests for manifest handling, asset transfer, and content deduplication.

mod common;

use std::io::Cursor;

use common::{
    build_archive, build_library, corrupt, set_compression_method, write_archive, Entry, ICON_PNG,
};
use droplib::library::import_from_reader;
use droplib::{
    import_library, AssetKey, AssetType, ContentStore, DiskStore, ImportError, MemoryStore,
};
use tempfile::TempDir;

#[test]
fn test_import_single_icon() {
    let temp = TempDir::new().unwrap();
    let bytes = build_library("foo", &[Entry::File("content/icon.png", ICON_PNG)]);
    let path = write_archive(temp.path(), "a.mtlib", &bytes);
    let store = MemoryStore::new();

    let library = import_library(&path, &store).unwrap();

    assert_eq!(library.namespace(), "foo");
    assert_eq!(library.manifest().name, "Test Library");
    assert_eq!(library.assets().len(), 1);

    let icon = library.asset_for("content/icon.png").unwrap();
    assert_eq!(icon.key, AssetKey::of(ICON_PNG));
    assert_eq!(icon.asset_type, AssetType::Image);

    assert_eq!(store.count().unwrap(), 1);
    let stored = store.get(&icon.key).unwrap().unwrap();
    assert_eq!(stored.name(), "foo/content/icon.png");
    assert_eq!(stored.data(), ICON_PNG);
}

#[test]
fn test_missing_manifest_leaves_store_unchanged() {
    let store = MemoryStore::new();
    let seed = build_library("seed", &[Entry::File("content/seed.txt", b"seed")]);
    import_from_reader(Cursor::new(seed), "seed.mtlib", &store).unwrap();
    let before = store.count().unwrap();

    let bytes = build_archive(&[
        Entry::File("content/icon.png", ICON_PNG),
        Entry::File("content/notes.txt", b"notes"),
    ]);
    let err = import_from_reader(Cursor::new(bytes), "no-manifest.mtlib", &store).unwrap_err();

    match err {
        ImportError::MissingManifest { archive } => assert_eq!(archive, "no-manifest.mtlib"),
        other => panic!("expected MissingManifest, got {:?}", other),
    }
    assert_eq!(store.count().unwrap(), before);
}

#[test]
fn test_malformed_manifest() {
    let store = MemoryStore::new();

    for manifest in [
        &b"{not json"[..],
        &br#"{"name": "no namespace"}"#[..],
        &br#"{"namespace": "foo", "unknownField": true}"#[..],
    ] {
        let bytes = build_archive(&[
            Entry::File("library.json", manifest),
            Entry::File("content/a.txt", b"a"),
        ]);
        let err = import_from_reader(Cursor::new(bytes), "bad.mtlib", &store).unwrap_err();
        assert!(
            matches!(err, ImportError::MalformedManifest { .. }),
            "unexpected error: {:?}",
            err
        );
    }

    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_only_content_files_are_mapped() {
    let store = MemoryStore::new();
    let bytes = build_library(
        "net.example.maps",
        &[
            Entry::File("README.md", b"# not content"),
            Entry::Dir("content/"),
            Entry::Dir("content/audio/"),
            Entry::File("content/audio/empty.txt", b"placeholder"),
            Entry::File("content/macros/roll.js", b"function roll() { return 4; }"),
            Entry::File("content/data/table.json", br#"{"rows": []}"#),
            Entry::File("other/content/skip.txt", b"skip"),
        ],
    );

    let (library, stats) = import_from_reader(Cursor::new(bytes), "maps.mtlib", &store).unwrap();

    let paths: Vec<&str> = library.assets().keys().map(String::as_str).collect();
    assert_eq!(
        paths,
        vec![
            "content/audio/empty.txt",
            "content/data/table.json",
            "content/macros/roll.js",
        ]
    );
    assert_eq!(stats.assets, 3);
    assert_eq!(stats.inserted, 3);

    assert_eq!(
        library.asset_for("content/macros/roll.js").unwrap().asset_type,
        AssetType::Javascript
    );
    assert_eq!(
        library.asset_for("content/data/table.json").unwrap().asset_type,
        AssetType::Json
    );
}

#[test]
fn test_shared_content_stored_once() {
    let store = MemoryStore::new();
    let shared: &[u8] = b"shared token art";

    let first = build_library("alpha", &[Entry::File("content/token.dat", shared)]);
    let second = build_library(
        "beta",
        &[
            Entry::File("content/art/renamed.dat", shared),
            Entry::File("content/own.txt", b"beta only"),
        ],
    );

    let (alpha, _) = import_from_reader(Cursor::new(first), "alpha.mtlib", &store).unwrap();
    let (beta, stats) = import_from_reader(Cursor::new(second), "beta.mtlib", &store).unwrap();

    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.reused, 1);

    let a = alpha.asset_for("content/token.dat").unwrap();
    let b = beta.asset_for("content/art/renamed.dat").unwrap();
    assert_eq!(a.key, b.key);
    assert_eq!(a.key, AssetKey::of(shared));

    // The first importer's name is kept
    assert_eq!(store.get(&a.key).unwrap().unwrap().name(), "alpha/content/token.dat");
}

#[test]
fn test_reimport_does_not_duplicate() {
    let store = MemoryStore::new();
    let bytes = build_library(
        "foo",
        &[
            Entry::File("content/icon.png", ICON_PNG),
            Entry::File("content/readme.txt", b"hello"),
        ],
    );

    let (first, _) = import_from_reader(Cursor::new(bytes.clone()), "a.mtlib", &store).unwrap();
    let count = store.count().unwrap();
    let (second, stats) = import_from_reader(Cursor::new(bytes), "a.mtlib", &store).unwrap();

    assert_eq!(store.count().unwrap(), count);
    assert_eq!(stats.inserted, 0);
    assert_eq!(stats.reused, 2);
    assert_eq!(first, second);
}

#[test]
fn test_sniffing_wins_over_extension() {
    let store = MemoryStore::new();
    let bytes = build_library(
        "foo",
        &[
            Entry::File("content/notes.txt", b"plain text notes\n"),
            Entry::File("content/notes.bin", b"more plain text\n"),
            Entry::File("content/disguised.txt", ICON_PNG),
            Entry::File("content/unknown", &[0x00, 0x9F, 0x92, 0x96, 0x00]),
        ],
    );

    let (library, _) = import_from_reader(Cursor::new(bytes), "a.mtlib", &store).unwrap();
    let category = |path: &str| library.asset_for(path).unwrap().asset_type;

    assert_eq!(category("content/notes.txt"), AssetType::Text);
    assert_eq!(category("content/notes.bin"), AssetType::Text);
    assert_eq!(category("content/disguised.txt"), AssetType::Image);
    assert_eq!(category("content/unknown"), AssetType::Other);
}

#[test]
fn test_corrupt_entry_fails_without_rollback() {
    let store = MemoryStore::new();
    let mut bytes = build_library(
        "foo",
        &[
            Entry::File("content/first.txt", b"first entry survives"),
            Entry::File("content/second.txt", b"second entry is damaged"),
        ],
    );
    corrupt(&mut bytes, b"second entry is damaged");

    let err = import_from_reader(Cursor::new(bytes), "broken.mtlib", &store).unwrap_err();

    match err {
        ImportError::ArchiveRead { archive, entry, .. } => {
            assert_eq!(archive, "broken.mtlib");
            assert_eq!(entry, "content/second.txt");
        }
        other => panic!("expected ArchiveRead, got {:?}", other),
    }
    assert!(store.exists(&AssetKey::of(b"first entry survives")).unwrap());
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_undecodable_entry_outside_content_is_ignored() {
    let store = MemoryStore::new();
    let mut bytes = build_library(
        "foo",
        &[
            Entry::File("extras/readme.bz", b"never opened"),
            Entry::File("content/a.txt", b"kept"),
        ],
    );
    // 12 = bzip2, which this build cannot decode
    set_compression_method(&mut bytes, "extras/readme.bz", 12);

    let (library, stats) = import_from_reader(Cursor::new(bytes), "x.mtlib", &store).unwrap();

    assert_eq!(library.assets().len(), 1);
    assert!(library.asset_for("content/a.txt").is_some());
    assert_eq!(stats.assets, 1);
}

#[test]
fn test_undecodable_content_entry_is_named_in_error() {
    let store = MemoryStore::new();
    let mut bytes = build_library("foo", &[Entry::File("content/packed.bz", b"cannot read")]);
    set_compression_method(&mut bytes, "content/packed.bz", 12);

    let err = import_from_reader(Cursor::new(bytes), "x.mtlib", &store).unwrap_err();

    match err {
        ImportError::ArchiveRead { entry, .. } => assert_eq!(entry, "content/packed.bz"),
        other => panic!("expected ArchiveRead, got {:?}", other),
    }
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_not_a_zip_file() {
    let temp = TempDir::new().unwrap();
    let path = write_archive(temp.path(), "fake.mtlib", b"definitely not a zip");
    let store = MemoryStore::new();

    let err = import_library(&path, &store).unwrap_err();
    assert!(matches!(err, ImportError::OpenArchive { .. }));
}

#[test]
fn test_import_into_disk_store() {
    let temp = TempDir::new().unwrap();
    let store = DiskStore::open(temp.path().join("store")).unwrap();
    let bytes = build_library(
        "foo",
        &[
            Entry::File("content/icon.png", ICON_PNG),
            Entry::File("content/copy.png", ICON_PNG),
        ],
    );
    let path = write_archive(temp.path(), "a.mtlib", &bytes);

    let library = import_library(&path, &store).unwrap();

    assert_eq!(library.assets().len(), 2);
    assert_eq!(store.count().unwrap(), 1);

    let key = AssetKey::of(ICON_PNG);
    let info = store.info(&key).unwrap().unwrap();
    assert_eq!(info.asset_type, AssetType::Image);
    assert_eq!(info.media_type.as_str(), "image/png");
    assert_eq!(store.get(&key).unwrap().unwrap().data(), ICON_PNG);
}
