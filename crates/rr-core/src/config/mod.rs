//! Configuration management for rcon-relay
//!
//! One TOML file with `[rcon]` and `[http]` tables. Every key is optional;
//! missing ones fall back to the defaults in [`RconConfig`] and
//! [`HttpConfig`].

mod relay;
pub mod serde_utils;

pub use relay::{HttpConfig, RconConfig, RelayConfig};

use crate::error::ConfigError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const TEMPLATE_HEADER: &str = "\
# rcon-relay configuration
#
# Durations are whole seconds. RCON_HOST, RCON_PORT and RCON_PASSWORD in the
# environment override the [rcon] values below.

";

/// `<config dir>/rcon-relay/config.toml`, or `./rcon-relay/config.toml`
/// when the platform has no config dir
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rcon-relay")
        .join("config.toml")
}

/// Read and parse a relay config file
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Invalid(format!("Failed to read {:?}: {}", path, e)),
    })?;

    Ok(toml::from_str(&content)?)
}

/// Write a config file holding every default, for editing by hand.
///
/// Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::Invalid(format!(
            "{:?} already exists; not overwriting",
            path
        )));
    }

    let body = toml::to_string_pretty(&RelayConfig::default())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create {:?}: {}", parent, e)))?;
    }

    std::fs::write(path, format!("{}{}", TEMPLATE_HEADER, body))
        .map_err(|e| ConfigError::Invalid(format!("Failed to write {:?}: {}", path, e)))
}
