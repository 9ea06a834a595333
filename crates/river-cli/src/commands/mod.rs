//! CLI command implementations

pub mod config;
pub mod sample;
pub mod simulate;

use anyhow::{Context, Result};
use river_core::RiverConfig;
use std::path::Path;

/// Load the config at `path`, or the defaults when no path is given
pub fn load_config(path: Option<&str>) -> Result<RiverConfig> {
    match path {
        Some(path) => RiverConfig::load_from_file(Path::new(path))
            .with_context(|| format!("Failed to load config '{}'", path)),
        None => Ok(RiverConfig::default()),
    }
}
