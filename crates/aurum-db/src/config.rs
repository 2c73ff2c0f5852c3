//! # Aurum Configuration
//!
//! Settings for the database and the codec tunables.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     AURUM_DB_PATH=/srv/aurum/aurum.db                                   │
//! │     AURUM_DB_MAX_CONNECTIONS=8                                          │
//! │     AURUM_PRICE_KEYWORD=BLACKSMITH                                      │
//! │     AURUM_MAX_RANGE=1000                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/aurum/aurum.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.aurum.aurum/aurum.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "aurum.db"
//! max_connections = 5
//!
//! [codec]
//! price_keyword = "MONEYTALKS"
//! max_range_size = 500
//! ```

use aurum_core::price::{PriceCipher, DEFAULT_PRICE_KEYWORD};
use aurum_core::range::{RangeExpander, DEFAULT_MAX_RANGE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Relative paths resolve against the working directory.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "aurum", "aurum")
        .map(|dirs| dirs.data_dir().join("aurum.db"))
        .unwrap_or_else(|| PathBuf::from("aurum.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Codec Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecSettings {
    /// Ten distinct letters for the price tag cipher.
    #[serde(default = "default_price_keyword")]
    pub price_keyword: String,

    /// Ceiling on SKUs produced by one range expansion.
    #[serde(default = "default_max_range")]
    pub max_range_size: usize,
}

fn default_price_keyword() -> String {
    DEFAULT_PRICE_KEYWORD.to_string()
}

fn default_max_range() -> usize {
    DEFAULT_MAX_RANGE
}

impl Default for CodecSettings {
    fn default() -> Self {
        CodecSettings {
            price_keyword: default_price_keyword(),
            max_range_size: default_max_range(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AurumConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub codec: CodecSettings,
}

impl AurumConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (aurum.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file without applying environment overrides.
    pub fn from_file(path: &Path) -> DbResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> DbResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| DbError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| DbError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DbResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(DbError::InvalidConfig("database.path must not be empty".into()));
        }

        if self.database.max_connections == 0 {
            return Err(DbError::InvalidConfig(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.codec.max_range_size == 0 {
            return Err(DbError::InvalidConfig(
                "codec.max_range_size must be greater than 0".into(),
            ));
        }

        PriceCipher::new(&self.codec.price_keyword)
            .map_err(|e| DbError::InvalidConfig(format!("codec.price_keyword: {e}")))?;

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("AURUM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(max) = std::env::var("AURUM_DB_MAX_CONNECTIONS") {
            match max.parse::<u32>() {
                Ok(n) => self.database.max_connections = n,
                Err(_) => warn!(value = %max, "Ignoring non-numeric AURUM_DB_MAX_CONNECTIONS"),
            }
        }

        if let Ok(keyword) = std::env::var("AURUM_PRICE_KEYWORD") {
            debug!("Overriding price keyword from environment");
            self.codec.price_keyword = keyword;
        }

        if let Ok(max) = std::env::var("AURUM_MAX_RANGE") {
            match max.parse::<usize>() {
                Ok(n) => self.codec.max_range_size = n,
                Err(_) => warn!(value = %max, "Ignoring non-numeric AURUM_MAX_RANGE"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "aurum", "aurum")
            .map(|dirs| dirs.config_dir().join("aurum.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Price cipher built from the configured keyword.
    pub fn price_cipher(&self) -> DbResult<PriceCipher> {
        Ok(PriceCipher::new(&self.codec.price_keyword)?)
    }

    /// Range expander with the configured ceiling.
    pub fn range_expander(&self) -> RangeExpander {
        RangeExpander::with_limit(self.codec.max_range_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AurumConfig::default();
        assert_eq!(config.codec.price_keyword, "MONEYTALKS");
        assert_eq!(config.codec.max_range_size, 500);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AurumConfig::default();

        config.codec.price_keyword = "MONEYMONEY".to_string();
        assert!(matches!(config.validate(), Err(DbError::InvalidConfig(_))));

        config.codec.price_keyword = "blacksmith".to_string();
        assert!(config.validate().is_ok());

        config.codec.max_range_size = 0;
        assert!(config.validate().is_err());

        config.codec.max_range_size = 50;
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AurumConfig = toml::from_str(
            r#"
            [codec]
            price_keyword = "BLACKSMITH"
            "#,
        )
        .unwrap();
        assert_eq!(config.codec.price_keyword, "BLACKSMITH");
        assert_eq!(config.codec.max_range_size, DEFAULT_MAX_RANGE);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.range_expander().max_items(), DEFAULT_MAX_RANGE);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("aurum-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("aurum.toml");

        let mut config = AurumConfig::default();
        config.database.path = PathBuf::from("shop.db");
        config.codec.max_range_size = 120;
        config.save(Some(path.clone())).unwrap();

        let loaded = AurumConfig::from_file(&path).unwrap();
        assert_eq!(loaded.database.path, PathBuf::from("shop.db"));
        assert_eq!(loaded.codec.max_range_size, 120);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AurumConfig::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[codec]"));
    }
}
