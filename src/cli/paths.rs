//! Default locations.
//!
//! Configuration lives under the platform config directory:
//! - `<config dir>/mcdesk/config.toml`
//!
//! The session file location is owned by [`crate::config::SessionConfig`].

use std::path::PathBuf;

/// The mcdesk configuration directory.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mcdesk")
}

/// Default config file path.
pub fn default_config() -> PathBuf {
    config_dir().join("config.toml")
}
