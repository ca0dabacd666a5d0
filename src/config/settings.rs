//! User settings for userdir
//!
//! Display preferences, the default log level and list limits.

use serde::{Deserialize, Serialize};

use super::paths::UserDirPaths;
use crate::error::UserDirError;

/// User settings for userdir
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date format preference (strftime format) used for birth dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Timestamp format (strftime format) used for audit records
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of audit records shown by `log list` when no limit is given
    #[serde(default = "default_audit_list_limit")]
    pub audit_list_limit: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S UTC".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_audit_list_limit() -> usize {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            date_format: default_date_format(),
            timestamp_format: default_timestamp_format(),
            log_level: default_log_level(),
            audit_list_limit: default_audit_list_limit(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &UserDirPaths) -> Result<Self, UserDirError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                UserDirError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                UserDirError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - `init` decides when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &UserDirPaths) -> Result<(), UserDirError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            UserDirError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| UserDirError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
