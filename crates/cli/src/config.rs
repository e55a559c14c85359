//! Configuration and state file resolution.

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use folio_core::ConsoleConfig;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "folio";

fn xdg_dir(var: &str, fallback: &[&str]) -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(var) {
        return Ok(PathBuf::from(path));
    }
    let home = std::env::var_os("HOME")
        .ok_or_else(|| anyhow::anyhow!("HOME not set; set {var}"))?;
    Ok(fallback.iter().fold(PathBuf::from(home), |p, part| p.join(part)))
}

/// Config file location: `--config`, then `FOLIO_CONFIG`, then
/// `$XDG_CONFIG_HOME/folio/config.toml`.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os("FOLIO_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    Ok(xdg_dir("XDG_CONFIG_HOME", &[".config"])?
        .join(APP_DIR)
        .join("config.toml"))
}

/// Default state file: `$XDG_STATE_HOME/folio/state.json`.
pub fn default_state_path() -> Result<PathBuf> {
    Ok(xdg_dir("XDG_STATE_HOME", &[".local", "state"])?
        .join(APP_DIR)
        .join("state.json"))
}

/// Load the console configuration.
///
/// The TOML file is optional; `FOLIO_`-prefixed variables override it, with
/// `__` separating sections (`FOLIO_API__BASE_URL`).
pub fn load_config(path: &Path) -> Result<ConsoleConfig> {
    let mut figment = Figment::new();
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    }
    figment = figment.merge(Env::prefixed("FOLIO_").split("__"));

    let config: ConsoleConfig = figment
        .extract()
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// State file to use: `--state`, then `state.path`, then the default.
pub fn state_path(explicit: Option<&Path>, config: &ConsoleConfig) -> Result<PathBuf> {
    match explicit.or(config.state.path.as_deref()) {
        Some(path) => Ok(path.to_path_buf()),
        None => default_state_path(),
    }
}
