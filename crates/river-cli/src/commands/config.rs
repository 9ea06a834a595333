//! Config command

use super::load_config;
use anyhow::{Context, Result};

pub fn run(config_path: Option<&str>, output: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let toml = config
        .to_toml_string()
        .context("Failed to serialize config")?;

    match output {
        Some(path) => {
            std::fs::write(path, &toml).with_context(|| format!("Failed to write '{}'", path))?;
            println!("Wrote config to {}", path);
        }
        None => print!("{}", toml),
    }

    Ok(())
}
