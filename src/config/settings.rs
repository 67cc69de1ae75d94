//! Bot settings loading from config.toml
//!
//! Non-secret runtime settings live in a TOML file. The Discord token and
//! database URL come from the environment instead (see `main.rs`).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Environment variable that overrides the settings file location
pub const SETTINGS_PATH_ENV: &str = "HERALD_CONFIG";

const DEFAULT_SETTINGS_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Command parsing settings
    #[serde(default)]
    pub command: CommandSettings,
}

/// The `[command]` table
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSettings {
    /// Prefix for prefix commands, also what `{prefix}` expands to
    #[serde(default = "default_secondary_prefix")]
    pub secondary_prefix: String,
}

fn default_secondary_prefix() -> String {
    "tx!".to_string()
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            secondary_prefix: default_secondary_prefix(),
        }
    }
}

/// Parses settings from TOML text
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed. A
/// missing file yields the defaults.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `$HERALD_CONFIG`, or ./config.toml when unset
pub fn load_default_settings() -> Result<Settings> {
    let path =
        std::env::var(SETTINGS_PATH_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    load_settings(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let settings = parse_settings(
            r#"
            [command]
            secondary_prefix = "h!"
        "#,
        )
        .unwrap();
        assert_eq!(settings.command.secondary_prefix, "h!");
    }

    #[test]
    fn test_missing_values_use_defaults() {
        assert_eq!(parse_settings("").unwrap().command.secondary_prefix, "tx!");
        assert_eq!(
            parse_settings("[command]").unwrap().command.secondary_prefix,
            "tx!"
        );
    }

    #[test]
    fn test_malformed_settings_are_config_errors() {
        let result = parse_settings("[command\nsecondary_prefix = 1");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = load_settings("definitely/not/here.toml").unwrap();
        assert_eq!(settings.command.secondary_prefix, "tx!");
    }
}
