//! Configuration for droplib paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (DROPLIB_HOME, DROPLIB_STORE)
//! 2. Config file (.droplib/config.yaml)
//! 3. Defaults (~/.droplib)
//!
//! Config file discovery:
//! - Searches current directory and parents for .droplib/config.yaml
//! - `home` is relative to the .droplib/ directory, `store` to the project root

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const ENV_HOME: &str = "DROPLIB_HOME";
const ENV_STORE: &str = "DROPLIB_STORE";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .droplib/)
    pub home: Option<String>,
    /// Content store directory (relative to the project root)
    pub store: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// droplib home directory
    pub home: PathBuf,
    /// Content store root
    pub store: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".droplib").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine env overrides, an optional config file and the default home
fn resolve(
    default_home: PathBuf,
    config_path: Option<&Path>,
    env_home: Option<String>,
    env_store: Option<String>,
) -> Result<ResolvedConfig> {
    let file = config_path.map(load_config_file).transpose()?;
    let paths = file.map(|f| f.paths).unwrap_or_default();

    // .droplib/ and the project root that contains it
    let droplib_dir = config_path.and_then(Path::parent);
    let base_dir = droplib_dir.and_then(Path::parent);

    let home = match (env_home, droplib_dir, paths.home.as_deref()) {
        (Some(env), _, _) => PathBuf::from(env),
        (None, Some(dir), Some(home)) => resolve_path(dir, home),
        _ => default_home,
    };

    let store = match (env_store, base_dir, paths.store.as_deref()) {
        (Some(env), _, _) => PathBuf::from(env),
        (None, Some(dir), Some(store)) => resolve_path(dir, store),
        _ => home.join("store"),
    };

    Ok(ResolvedConfig {
        home,
        store,
        config_file: config_path.map(Path::to_path_buf),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".droplib");

    resolve(
        default_home,
        find_config_file().as_deref(),
        std::env::var(ENV_HOME).ok(),
        std::env::var(ENV_STORE).ok(),
    )
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the content store directory.
pub fn store_dir() -> Result<PathBuf> {
    Ok(config()?.store.clone())
}
