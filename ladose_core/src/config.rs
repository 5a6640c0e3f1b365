//! Configuration file support for Ladose.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/ladose/config.toml`.

use crate::catalog::get_default_catalog;
use crate::{Catalog, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Drug catalog source
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Replacement catalog file; the built-in list is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Presentation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            Some(config_path) => {
                tracing::info!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
            None => {
                tracing::info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        if config.display.decimal_places > 6 {
            return Err(Error::Config(format!(
                "display.decimal_places must be at most 6, got {}",
                config.display.decimal_places
            )));
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        let base = dirs::config_dir().or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
        })?;
        Some(base.join("ladose").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Resolve the drug catalog this configuration points at
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog.path {
            Some(path) => Catalog::load_from(path),
            None => Ok(get_default_catalog().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.catalog.path.is_none());
        assert_eq!(config.display.decimal_places, 2);
        assert_eq!(config.catalog().unwrap().drugs.len(), 6);
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.display.decimal_places = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.display.decimal_places, 3);
        assert!(loaded.catalog.path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[catalog]
path = "/etc/ladose/drugs.toml"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.catalog.path,
            Some(PathBuf::from("/etc/ladose/drugs.toml"))
        );
        assert_eq!(config.display.decimal_places, 2); // default
    }

    #[test]
    fn test_excessive_precision_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ndecimal_places = 12\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_catalog_from_configured_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog_path = temp_dir.path().join("drugs.toml");
        std::fs::write(
            &catalog_path,
            "[[drugs]]\nname = \"Articaine\"\ntoxic_dose_per_kg = 7.0\nconcentrations = [40.0]\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.catalog.path = Some(catalog_path);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.drugs.len(), 1);
        assert!(catalog.lookup("Articaine").is_ok());
    }

    #[test]
    fn test_missing_catalog_file_is_io_error() {
        let mut config = Config::default();
        config.catalog.path = Some(PathBuf::from("/nonexistent/ladose/drugs.toml"));
        assert!(matches!(config.catalog(), Err(Error::Io(_))));
    }
}
