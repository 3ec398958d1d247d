//! Configuration loader with XDG-compliant path resolution
//!
//! Loads configuration from multiple locations with layered priority:
//! 1. `/etc/shellac/config.toml` (lowest priority)
//! 2. `~/.config/shellac/config.toml`
//! 3. `~/.shellac.toml`
//! 4. `./.shellac.toml` (highest priority)

use std::path::PathBuf;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use super::model::Config;

/// Application name used for XDG directories
const APP_NAME: &str = "shellac";

/// Prefix for environment overrides
const ENV_PREFIX: &str = "SHELLAC_";

/// Get XDG config search paths in priority order (lowest to highest)
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide config (lowest priority)
    paths.push(PathBuf::from(format!("/etc/{}/config.toml", APP_NAME)));

    // 2. XDG config home
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join("config.toml"));
    }

    // 3. Home directory
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}.toml", APP_NAME)));
    }

    // 4. Current directory (highest priority)
    paths.push(PathBuf::from(format!(".{}.toml", APP_NAME)));

    paths
}

/// Load configuration with XDG layering
///
/// Configurations are merged in priority order, with later files
/// overriding earlier ones. Environment variables with prefix
/// `SHELLAC_` override all file-based configuration.
///
/// # Arguments
/// * `override_path` - Optional path to a config file that takes highest file priority
pub fn load_config(override_path: Option<&str>) -> Result<Config> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    for path in find_config_files() {
        tracing::debug!("Loading config from: {}", path.display());
        figment = figment.merge(Toml::file(&path));
    }

    if let Some(path) = override_path {
        let path = PathBuf::from(path);
        if path.exists() {
            tracing::debug!("Loading override config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        } else {
            tracing::warn!("Override config not found: {}", path.display());
        }
    }

    // Format: SHELLAC_DEFAULTS__TIMEOUT_MS=5000
    // Maps to: defaults.timeout_ms = 5000
    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Existing config files, lowest priority first
pub fn find_config_files() -> Vec<PathBuf> {
    config_paths().into_iter().filter(|p| p.exists()).collect()
}
