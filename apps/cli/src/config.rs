//! # Application Configuration
//!
//! Seller header, document defaults, warranty codes and database location.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (--db)                              (highest)          │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     FATURA_DB_PATH, FATURA_CURRENCY, FATURA_COUNTER_KEY,               │
//! │     FATURA_WARRANTY_CODES, FATURA_PRINTED_BY                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <PATH>, or the platform config dir:                       │
//! │     ~/.config/fatura/fatura.toml (Linux)                               │
//! │                                                                         │
//! │  4. Default Values                                   (lowest)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [seller]
//! name_english = "Road Biker Motorcycles"
//! name_arabic = "رود بايكر للدراجات النارية"
//! tax_number = "301294984200003"
//! phone = "0500123007"
//!
//! [document]
//! currency = "SAR"
//! counter_key = "fatura.document_seq"
//! printed_by = "Abu Kadi"
//!
//! [warranty]
//! codes = ["500", "1005", "BOXER-150"]
//!
//! [database]
//! path = "/var/lib/fatura/fatura.db"
//! ```

use directories::ProjectDirs;
use fatura_core::numbering::DEFAULT_COUNTER_KEY;
use fatura_core::warranty::DEFAULT_WARRANTY_CODES;
use fatura_core::{WarrantyRules, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "fatura.toml";
const DATABASE_FILE_NAME: &str = "fatura.db";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the platform data directory")]
    NoDataDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// The business issuing the documents, printed in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerConfig {
    pub name_english: String,
    pub name_arabic: String,
    pub address_english: String,
    pub address_arabic: String,
    pub tax_number: String,
    pub phone: String,
}

impl Default for SellerConfig {
    fn default() -> Self {
        SellerConfig {
            name_english: "Road Biker Motorcycles".to_string(),
            name_arabic: "رود بايكر للدراجات النارية".to_string(),
            address_english: "Hail - Al-Naisiyah Road".to_string(),
            address_arabic: "حائل - طريق النصيبية".to_string(),
            tax_number: "301294984200003".to_string(),
            phone: "0500123007".to_string(),
        }
    }
}

/// Per-document defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Currency code printed on new documents.
    pub currency: String,
    /// Counter key shared by all document types.
    pub counter_key: String,
    /// Name in the "Printed by" footer.
    pub printed_by: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        DocumentConfig {
            currency: DEFAULT_CURRENCY.to_string(),
            counter_key: DEFAULT_COUNTER_KEY.to_string(),
            printed_by: "Abu Kadi".to_string(),
        }
    }
}

/// Warranty-eligible item codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarrantyConfig {
    pub codes: Vec<String>,
}

impl Default for WarrantyConfig {
    fn default() -> Self {
        WarrantyConfig {
            codes: DEFAULT_WARRANTY_CODES.iter().map(|code| code.to_string()).collect(),
        }
    }
}

/// Where the counter database lives. `None` means the platform data dir.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

// =============================================================================
// App Config
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seller: SellerConfig,
    pub document: DocumentConfig,
    pub warranty: WarrantyConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform config dir)
    /// 3. `FATURA_*` environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// default file is not.
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Reads and parses one TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses TOML text; missing tables and keys take their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Checks the values the engine cannot work without.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.document.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("document.currency must not be empty".into()));
        }
        if self.document.counter_key.trim().is_empty() {
            return Err(ConfigError::Invalid("document.counter_key must not be empty".into()));
        }
        Ok(())
    }

    /// Applies `FATURA_*` overrides read through `lookup`.
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("FATURA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(currency) = lookup("FATURA_CURRENCY") {
            self.document.currency = currency;
        }

        if let Some(key) = lookup("FATURA_COUNTER_KEY") {
            debug!(key = %key, "Overriding counter key from environment");
            self.document.counter_key = key;
        }

        if let Some(codes) = lookup("FATURA_WARRANTY_CODES") {
            self.warranty.codes = codes
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(name) = lookup("FATURA_PRINTED_BY") {
            self.document.printed_by = name;
        }
    }

    /// Default config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "fatura", "fatura").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Configured database path, or `fatura.db` in the platform data dir.
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.database.path {
            return Ok(path.clone());
        }
        ProjectDirs::from("com", "fatura", "fatura")
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or(ConfigError::NoDataDir)
    }

    /// Warranty rules built from the configured codes.
    pub fn warranty_rules(&self) -> WarrantyRules {
        WarrantyRules::new(&self.warranty.codes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.document.currency, "SAR");
        assert_eq!(config.document.counter_key, "fatura.document_seq");
        assert_eq!(config.warranty.codes, vec!["500", "1005", "BOXER-150"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [document]
            printed_by = "Cashier 2"

            [warranty]
            codes = ["X1"]
            "#,
        )
        .unwrap();

        assert_eq!(config.document.printed_by, "Cashier 2");
        assert_eq!(config.document.currency, "SAR");
        assert_eq!(config.seller, SellerConfig::default());
        assert!(config.warranty_rules().is_eligible("x1"));
        assert!(!config.warranty_rules().is_eligible("500"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("FATURA_DB_PATH", "/tmp/f.db"),
            ("FATURA_CURRENCY", "USD"),
            ("FATURA_COUNTER_KEY", "branch-2"),
            ("FATURA_WARRANTY_CODES", " 500 , ,XR-9"),
            ("FATURA_PRINTED_BY", "Night shift"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/f.db"));
        assert_eq!(config.document.currency, "USD");
        assert_eq!(config.document.counter_key, "branch-2");
        assert_eq!(config.warranty.codes, vec!["500", "XR-9"]);
        assert_eq!(config.document.printed_by, "Night shift");
    }

    #[test]
    fn test_validation_rejects_blank_values() {
        let mut config = AppConfig::default();
        config.document.currency = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.document.counter_key.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/fatura.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[seller]"));
        assert!(text.contains("[warranty]"));
        assert_eq!(AppConfig::from_toml(&text).unwrap(), AppConfig::default());
    }
}
