//! Application configuration loading from config.toml
//!
//! The configuration names the superusers and the default color catalog that
//! is seeded for every newly registered user. A missing file is not an error;
//! the defaults are empty.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Discord user IDs with unrestricted visibility
    #[serde(default)]
    pub superusers: Vec<String>,
    /// Color properties seeded for new users
    #[serde(default)]
    pub color_properties: Vec<ColorPropertyConfig>,
}

/// One default color property
#[derive(Debug, Deserialize, Clone)]
pub struct ColorPropertyConfig {
    /// Name of the color property
    pub name: String,
    /// Matter of importance, lower sorts first
    pub rank: i32,
}

impl AppConfig {
    /// Whether the Discord user is configured as a superuser, either in the
    /// file or through `SUPERUSER_IDS`.
    #[must_use]
    pub fn is_superuser(&self, discord_id: &str) -> bool {
        self.superusers.iter().any(|id| id == discord_id)
            || super::users::get_superuser_ids().contains(discord_id)
    }
}

/// Loads the application configuration from a TOML file
///
/// # Errors
/// Returns an error if the file exists but cannot be read, or if the TOML is
/// invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        tracing::warn!("No config file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }

    tracing::debug!("Loading configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_app_config() {
        let toml_str = r#"
            superusers = ["1234"]

            [[color_properties]]
            name = "Dominant bont"
            rank = 1

            [[color_properties]]
            name = "Cinnamon"
            rank = 2
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.superusers, vec!["1234".to_string()]);
        assert_eq!(config.color_properties.len(), 2);
        assert_eq!(config.color_properties[0].name, "Dominant bont");
        assert_eq!(config.color_properties[1].rank, 2);
        assert!(config.is_superuser("1234"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.superusers.is_empty());
        assert!(config.color_properties.is_empty());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = load_config("definitely/not/here/config.toml").unwrap();
        assert!(config.color_properties.is_empty());
    }
}
