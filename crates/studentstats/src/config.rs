//! Configuration management for studentstats.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::HashSet;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stats::{CohortTotal, DEFAULT_TOP_N};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "studentstats";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "students.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `STUSTAT_`, nested with `__`)
/// 2. TOML config file at `~/.config/studentstats/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Statistics configuration.
    pub statistics: StatisticsConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/studentstats/students.db`
    pub database_path: Option<PathBuf>,
}

/// Statistics-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Known population of each cohort, in display order.
    pub cohorts: Vec<CohortTotal>,
    /// Maximum number of words per word cloud.
    pub word_cloud_limit: usize,
    /// Maximum number of prefectures reported.
    pub prefecture_limit: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            cohorts: default_cohorts(),
            word_cloud_limit: DEFAULT_TOP_N,
            prefecture_limit: 10,
        }
    }
}

/// Department enrollment per academic year.
fn default_cohorts() -> Vec<CohortTotal> {
    vec![
        CohortTotal::new("B1", 125),
        CohortTotal::new("B2", 128),
        CohortTotal::new("B3", 132),
        CohortTotal::new("B4", 130),
    ]
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `STUSTAT_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("STUSTAT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// An empty cohort table is allowed; coverage figures are then omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let stats = &self.statistics;

        if stats.word_cloud_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "word_cloud_limit must be greater than 0".to_string(),
            });
        }

        if stats.prefecture_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "prefecture_limit must be greater than 0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for cohort in &stats.cohorts {
            if cohort.label.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "cohort label cannot be empty".to_string(),
                });
            }
            if !seen.insert(cohort.label.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("duplicate cohort label: {}", cohort.label),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.statistics.word_cloud_limit, 30);
        assert_eq!(config.statistics.prefecture_limit, 10);
        assert_eq!(config.statistics.cohorts.len(), 4);
    }

    #[test]
    fn test_default_cohorts() {
        let cohorts = default_cohorts();
        let total: usize = cohorts.iter().map(|c| c.total).sum();
        assert_eq!(total, 515);
        assert_eq!(cohorts[2], CohortTotal::new("B3", 132));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_cohort_table_allowed() {
        let mut config = Config::default();
        config.statistics.cohorts.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_word_cloud_limit() {
        let mut config = Config::default();
        config.statistics.word_cloud_limit = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("word_cloud_limit"));
    }

    #[test]
    fn test_validate_zero_prefecture_limit() {
        let mut config = Config::default();
        config.statistics.prefecture_limit = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("prefecture_limit"));
    }

    #[test]
    fn test_validate_duplicate_cohort() {
        let mut config = Config::default();
        config.statistics.cohorts.push(CohortTotal::new("B1", 3));

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("duplicate cohort label: B1"));
    }

    #[test]
    fn test_validate_blank_cohort_label() {
        let mut config = Config::default();
        config.statistics.cohorts.push(CohortTotal::new(" ", 3));

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("cannot be empty"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("students.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("studentstats"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_toml_overrides() {
        let path = std::env::temp_dir().join(format!(
            "studentstats_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"
[storage]
database_path = "/tmp/custom.db"

[statistics]
word_cloud_limit = 5

[[statistics.cohorts]]
label = "M1"
total = 40
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/custom.db"));
        assert_eq!(config.statistics.word_cloud_limit, 5);
        assert_eq!(config.statistics.prefecture_limit, 10);
        assert_eq!(config.statistics.cohorts, vec![CohortTotal::new("M1", 40)]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_toml_rejected() {
        let path = std::env::temp_dir().join(format!(
            "studentstats_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[statistics]\nword_cloud_limit = 0\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_statistics_config_deserialize() {
        let json = r#"{"prefecture_limit": 3}"#;
        let stats: StatisticsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(stats.prefecture_limit, 3);
        assert_eq!(stats.word_cloud_limit, 30);
        assert_eq!(stats.cohorts.len(), 4);
    }
}
