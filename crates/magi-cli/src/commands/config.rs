//! Config command

use anyhow::{Context, Result};
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let config = super::load_config(path)?;
    let output = config.to_toml().context("Failed to serialize config")?;
    print!("{}", output);
    Ok(())
}
