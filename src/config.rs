//! Configuration for the scheduling engine and its command-line front end.

use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldVisitConfig {
    /// Contract store settings.
    pub store: StoreConfig,
    /// Overdue reminder settings.
    pub reminders: ReminderConfig,
    /// Reminder delivery settings.
    pub messenger: MessengerConfig,
    /// Directory scope settings.
    pub directory: DirectoryConfig,
}

/// Contract store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding `contracts.db`.
    pub root_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_dir: paths::data_dir(),
        }
    }
}

/// Overdue reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Whether directory loads send overdue summaries at all.
    pub enabled: bool,
    /// JSON ledger of the last day a summary went to each technician.
    pub ledger_path: PathBuf,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ledger_path: paths::data_dir().join("reminders.json"),
        }
    }
}

/// Which messenger delivers overdue summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessengerKind {
    /// Write summaries to the log only.
    #[default]
    Log,
    /// Send through the WhatsApp Cloud API.
    Whatsapp,
}

/// Reminder delivery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    pub kind: MessengerKind,
    pub whatsapp: WhatsAppMessengerConfig,
}

/// WhatsApp Cloud API credentials and recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppMessengerConfig {
    /// Graph API base URL, overridable for testing.
    pub api_base: String,
    pub access_token: String,
    pub phone_number_id: String,
    /// Technician id (case-insensitive) to recipient phone number.
    pub recipients: BTreeMap<String, String>,
    /// Country calling code used to rewrite numbers starting with a
    /// trunk `0` (e.g. `353` turns `0871234567` into `353871234567`).
    pub default_country_code: Option<String>,
}

impl Default for WhatsAppMessengerConfig {
    fn default() -> Self {
        Self {
            api_base: "https://graph.facebook.com/v18.0".to_owned(),
            access_token: String::new(),
            phone_number_id: String::new(),
            recipients: BTreeMap::new(),
            default_country_code: None,
        }
    }
}

/// Directory scope configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// User names that see every technician's contracts.
    pub admin_users: Vec<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            admin_users: vec!["admin".to_owned()],
        }
    }
}

impl DirectoryConfig {
    /// Whether `user` is an administrator (case-insensitive).
    #[must_use]
    pub fn is_admin(&self, user: &str) -> bool {
        let user = user.trim();
        self.admin_users
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(user))
    }
}

impl FieldVisitConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::FieldVisitError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::FieldVisitError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        paths::config_file()
    }
}
