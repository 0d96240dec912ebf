//! Filesystem locations for configuration and data.
//!
//! | Purpose | Linux | Override |
//! |---------|-------|----------|
//! | Config | `~/.config/fieldvisit/` | `FIELDVISIT_CONFIG_DIR` |
//! | Data (store, reminder ledger) | `~/.local/share/fieldvisit/` | `FIELDVISIT_DATA_DIR` |

use std::path::PathBuf;

/// Application data directory.
///
/// Resolves to `dirs::data_dir()/fieldvisit/` by default. Override with
/// the `FIELDVISIT_DATA_DIR` environment variable.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FIELDVISIT_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("fieldvisit"))
        .unwrap_or_else(|| PathBuf::from("/tmp/fieldvisit-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/fieldvisit/` by default. Override with
/// the `FIELDVISIT_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("FIELDVISIT_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("fieldvisit"))
        .unwrap_or_else(|| PathBuf::from("/tmp/fieldvisit-config"))
}

/// `config_dir()/config.toml`.
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}
