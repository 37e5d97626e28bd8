//! Config command implementation

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Settings;

/// Print the effective settings as TOML
pub fn show(settings: &Settings) -> Result<()> {
    let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
    print!("{}", contents);
    Ok(())
}

/// Write the example config, asking before overwriting an existing file
pub fn init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => Settings::user_config_path()
            .ok_or_else(|| anyhow!("Could not determine the user config directory; pass a path"))?,
    };

    let prompt = format!("Overwrite {}?", path.display());
    if path.exists() && !force && !crate::utils::confirm(&prompt)? {
        crate::log_info!("Left {} unchanged", path.display());
        return Ok(());
    }

    write_example(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn write_example(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(path, Settings::example_config())
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}
