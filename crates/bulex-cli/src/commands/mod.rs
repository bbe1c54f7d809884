//! CLI command implementations.

pub mod batch;
pub mod config;
pub mod export;
pub mod learn;
pub mod process;
pub mod stats;

use std::path::PathBuf;

use anyhow::{Context, Result};
use bulex_core::{BulexConfig, JsonFileStore, LearningSystem};
use tracing::debug;

/// Default config file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bulex")
        .join("config.json")
}

/// Load configuration: explicit path, default location, or built-in defaults.
pub fn load_config(config_path: Option<&str>) -> Result<BulexConfig> {
    if let Some(path) = config_path {
        let path = PathBuf::from(path);
        return BulexConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("using config at {}", default_path.display());
        return BulexConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load config from {}", default_path.display()));
    }

    debug!("no config file, using defaults");
    Ok(BulexConfig::default())
}

/// Open the learning system over the configured data directory.
pub fn open_learning(config: &BulexConfig) -> Result<LearningSystem> {
    let store = JsonFileStore::new(&config.learning.data_dir);
    LearningSystem::open(Box::new(store), config.learning.clone())
        .context("Failed to open learning data")
}
