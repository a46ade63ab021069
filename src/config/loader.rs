// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ClusterConfig, RawClusterConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawClusterConfig`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// a checked [`ClusterConfig`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawClusterConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawClusterConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ClusterConfig> {
    let raw_config = load_from_path(&path)?;
    let config = ClusterConfig::try_from(raw_config)?;
    Ok(config)
}

/// Like [`load_and_validate`], but a missing file yields the defaults.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ClusterConfig> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "no cluster config found; using defaults");
        return Ok(ClusterConfig::default());
    }
    load_and_validate(path)
}

/// Default config location: `cluster.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("cluster.toml")
}
