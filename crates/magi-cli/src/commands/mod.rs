//! CLI command implementations

pub mod config;
pub mod probe;
pub mod rain;
pub mod simulate;

use anyhow::{Context, Result};
use magi_stage::StageConfig;
use std::path::Path;

/// `--config` wins over the layered lookup
pub fn load_config(path: Option<&Path>) -> Result<StageConfig> {
    match path {
        Some(path) => StageConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => StageConfig::load().context("Failed to load config"),
    }
}
