// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// Checks for unknown tool names, bad `after` references and cycles among
/// tool prerequisites.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Like [`load_and_validate`], but a missing file yields the default
/// configuration. The config file is optional; the CLI alone is enough.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(ConfigFile::default());
    }
    load_and_validate(path)
}

/// Default config location: `Toolstrap.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Toolstrap.toml")
}

/// Resolve the solution root relative to the config file's directory.
///
/// - Absolute `[solution].root` values are used as-is.
/// - If the config path has a non-empty parent (e.g. "build/Toolstrap.toml"),
///   relative roots are joined onto that directory.
/// - Otherwise they are joined onto the current working directory.
pub fn resolve_solution_root(config_path: &Path, cfg: &ConfigFile) -> PathBuf {
    let root = &cfg.solution.root;
    if root.is_absolute() {
        return root.clone();
    }

    let base = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join(root)
}
