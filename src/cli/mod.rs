//! Command-line interface for droplib.
//!
//! Provides commands for importing drop-in libraries, inspecting their
//! manifests, and examining the content store.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use zip::ZipArchive;

use crate::library::{import_library, is_drop_in_library, read_manifest, LibraryDescriptor};
use crate::store::{ContentStore, DiskStore};

pub mod store;

/// droplib - Drop-in library importer
#[derive(Parser, Debug)]
#[command(name = "droplib")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content store directory (overrides configuration)
    #[arg(long, global = true, env = "DROPLIB_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import drop-in library archives into the content store
    Import {
        /// Archives, or directories containing .mtlib files
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the imported library descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the manifest of an archive without importing it
    Inspect {
        /// Archive to inspect
        archive: PathBuf,
    },

    /// Examine the content store
    Store {
        #[command(subcommand)]
        command: store::StoreCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Import { paths, json } => {
                let store = open_store(self.store)?;
                import_archives(store, paths, json).await
            }
            Commands::Inspect { archive } => inspect_archive(&archive),
            Commands::Store { command } => {
                let disk = open_store(self.store)?;
                store::execute(&disk, command)
            }
            Commands::Config => show_config(),
        }
    }
}

/// Open the store given on the command line, or the configured one
fn open_store(dir: Option<PathBuf>) -> Result<DiskStore> {
    let dir = match dir {
        Some(dir) => dir,
        None => crate::config::store_dir()?,
    };
    DiskStore::open(&dir)
        .with_context(|| format!("Failed to open content store: {}", dir.display()))
}

/// Expand directories into the drop-in library files they contain
fn expand_paths(paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(&path)
                .with_context(|| format!("Failed to read directory: {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| is_drop_in_library(p))
                .collect();
            if found.is_empty() {
                warn!("No .mtlib files in {}", path.display());
            }
            found.sort();
            archives.extend(found);
        } else {
            archives.push(path);
        }
    }

    Ok(archives)
}

/// Import every archive concurrently, reporting each result
async fn import_archives(store: DiskStore, paths: Vec<PathBuf>, json: bool) -> Result<()> {
    let store = Arc::new(store);
    let archives = expand_paths(paths)?;
    let before = store.count()?;

    let handles: Vec<_> = archives
        .into_iter()
        .map(|path| {
            let store = Arc::clone(&store);
            tokio::task::spawn_blocking(move || {
                let result = import_library(&path, &store);
                (path, result)
            })
        })
        .collect();

    let mut imported: Vec<(PathBuf, LibraryDescriptor)> = Vec::new();
    let mut failures = 0;

    for handle in handles {
        let (path, result) = handle.await.context("Import task panicked")?;
        match result {
            Ok(library) => imported.push((path, library)),
            Err(e) => {
                failures += 1;
                eprintln!("[{} failed: {}]", path.display(), e);
            }
        }
    }

    if json {
        let libraries: Vec<&LibraryDescriptor> = imported.iter().map(|(_, l)| l).collect();
        println!("{}", serde_json::to_string_pretty(&libraries)?);
    } else {
        for (path, library) in &imported {
            print_library(path, library);
        }
        let after = store.count()?;
        println!(
            "Store: {} objects ({} new)",
            after,
            after.saturating_sub(before)
        );
    }

    if failures > 0 {
        anyhow::bail!("{} of {} imports failed", failures, failures + imported.len());
    }

    Ok(())
}

fn print_library(path: &Path, library: &LibraryDescriptor) {
    let manifest = library.manifest();
    println!("{}", path.display());
    println!("  Namespace: {}", library.namespace());
    if !manifest.name.is_empty() {
        println!("  Name:      {} {}", manifest.name, manifest.version);
    }
    println!("  Assets:    {}", library.assets().len());
    for (entry, asset) in library.assets() {
        println!("    {:<40} {:<10} {}", entry, asset.asset_type, asset.key);
    }
}

/// Print an archive's manifest
fn inspect_archive(path: &Path) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open archive: {}", path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Not a ZIP archive: {}", path.display()))?;

    let manifest = read_manifest(&mut archive, &path.display().to_string())?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);

    Ok(())
}

/// Show resolved configuration
fn show_config() -> Result<()> {
    let config = crate::config::config()?;

    println!("droplib configuration");
    println!("=====================");
    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!("Home:        {}", config.home.display());
    println!("Store:       {}", config.store.display());

    Ok(())
}
