//! Configuration file loading.
//!
//! The file format is [`tc_core::Config`] serialized as TOML. Command-line
//! flags are applied on top by the binary.

use anyhow::{Context, Result};
use std::path::Path;
use tc_core::Config;

/// Locations searched when no config file is given explicitly.
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["./tomecat.toml", "~/.config/tomecat/config.toml"];

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = Config::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    tracing::debug!("loaded config from {:?}", path);
    Ok(config)
}

/// Load config from default locations or return the default config.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_CONFIG_PATHS {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}
