//! Store subcommands for examining the content store.

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::library::AssetKey;
use crate::store::{ContentStore, DiskStore};

/// Store-related subcommands
#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// Show the store location and object count
    Stats,

    /// Show metadata of a stored object
    Show {
        /// Content hash key (hex SHA-256)
        key: String,
    },
}

pub fn execute(store: &DiskStore, command: StoreCommands) -> Result<()> {
    match command {
        StoreCommands::Stats => {
            println!("Store:   {}", store.root().display());
            println!("Objects: {}", store.count()?);
            Ok(())
        }
        StoreCommands::Show { key } => show_object(store, &key),
    }
}

fn show_object(store: &DiskStore, key: &str) -> Result<()> {
    let key = AssetKey::parse(key).with_context(|| format!("Invalid content key: {}", key))?;

    let info = store
        .info(&key)?
        .with_context(|| format!("Object not found: {}", key))?;

    println!("Key:        {}", info.key);
    println!("Name:       {}", info.name);
    println!("Type:       {}", info.asset_type);
    println!("Media type: {}", info.media_type);
    println!("Size:       {} bytes", info.size);
    println!("Stored at:  {}", info.stored_at);
    println!("Path:       {}", store.object_path(&key).display());

    Ok(())
}
