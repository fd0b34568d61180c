//! Configuration file loading for CLI defaults.
//!
//! Values come from, in order of precedence: CLI flags, the TOML config file,
//! then the library defaults in [`ClientConfig`].

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use media_downloader::ClientConfig;
use serde::Deserialize;

use crate::cli::Args;

/// TOML-backed file configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    /// Download client connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Download client read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// User-Agent override.
    pub user_agent: Option<String>,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/media-downloader/config.toml`
/// 2. `$HOME/.config/media-downloader/config.toml`
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("media-downloader")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("media-downloader")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist; the default path is optional.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        return load_file_config(path).map(Some);
    }
    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path).map(Some),
        _ => Ok(None),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    Ok(toml::from_str(raw)?)
}

/// Merges CLI flags over file values over library defaults.
pub(crate) fn client_config(args: &Args, file: Option<&FileConfig>) -> ClientConfig {
    let defaults = ClientConfig::default();
    let file = file.cloned().unwrap_or_default();

    let connect = args
        .connect_timeout
        .or(file.connect_timeout_secs)
        .unwrap_or(defaults.connect_timeout_secs);
    let read = args
        .read_timeout
        .or(file.read_timeout_secs)
        .unwrap_or(defaults.read_timeout_secs);
    let user_agent = args
        .user_agent
        .clone()
        .or(file.user_agent)
        .unwrap_or_else(|| defaults.user_agent.clone());

    defaults
        .with_timeouts(connect, read)
        .with_user_agent(user_agent)
}
