//! TOML configuration for tracker hosts (CLI, embedding apps).
//!
//! # Responsibility
//! - Describe storage location, logging setup and group labels.
//! - Validate values that other modules rely on before they are used.
//!
//! # Invariants
//! - Every section is optional; missing values fall back to defaults.
//! - Group labels are non-blank and distinct from each other.
//! - `logging.dir`, when set, is an absolute path.

use crate::engine::collate::{CollationError, TextCollator, ROOT_LOCALE};
use crate::logging::default_log_level;
use crate::model::category::GroupLabels;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub labels: GroupLabels,
    pub sorting: SortingConfig,
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite file; in-memory storage when absent.
    pub db_path: Option<PathBuf>,
}

/// `[sorting]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SortingConfig {
    /// BCP-47 tag whose collation orders names and titles.
    pub locale: String,
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            locale: ROOT_LOCALE.to_string(),
        }
    }
}

impl SortingConfig {
    pub fn collator(&self) -> Result<TextCollator, CollationError> {
        TextCollator::for_locale(&self.locale)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`; build-mode default when absent.
    pub level: Option<String>,
    /// Rolling log directory; file logging stays off when absent.
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    /// Effective level string.
    pub fn effective_level(&self) -> &str {
        match self.level.as_deref() {
            Some(level) => level,
            None => default_log_level(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Read { path: PathBuf, source: std::io::Error },
    /// Document is not valid TOML for this schema.
    Parse(toml::de::Error),
    /// Document parsed but a value is unusable.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config value: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

impl TrackerConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: TrackerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let pinned = self.labels.pinned.trim();
        let uncategorized = self.labels.uncategorized.trim();
        if pinned.is_empty() || uncategorized.is_empty() {
            return Err(ConfigError::Invalid(
                "labels.pinned and labels.uncategorized must not be blank".to_string(),
            ));
        }
        if pinned == uncategorized {
            return Err(ConfigError::Invalid(format!(
                "labels.pinned and labels.uncategorized must differ, both are `{pinned}`"
            )));
        }
        self.sorting
            .collator()
            .map_err(|err| ConfigError::Invalid(format!("sorting.locale: {err}")))?;
        if let Some(dir) = self.logging.dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// Reads and validates a config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<TrackerConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    TrackerConfig::from_toml_str(&text)
}

#[cfg(test)]
mod tests {
    use super::{load_config, ConfigError, LoggingConfig, TrackerConfig};
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.labels.pinned, "Pinned");
        assert_eq!(config.labels.uncategorized, "Uncategorized");
        assert!(config.storage.db_path.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let config = TrackerConfig::from_toml_str(
            r#"
            [storage]
            db_path = "/var/lib/tracker/tracker.sqlite3"

            [logging]
            level = "debug"
            dir = "/var/log/tracker"

            [labels]
            pinned = "Закрепленные"
            uncategorized = "Прочее"

            [sorting]
            locale = "ru"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.storage.db_path,
            Some(PathBuf::from("/var/lib/tracker/tracker.sqlite3"))
        );
        assert_eq!(config.logging.effective_level(), "debug");
        assert_eq!(config.labels.pinned, "Закрепленные");
        assert_eq!(config.sorting.collator().unwrap().locale(), "ru");
    }

    #[test]
    fn rejects_malformed_sorting_locale() {
        let err = TrackerConfig::from_toml_str("[sorting]\nlocale = \"not a locale\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn effective_level_falls_back_to_build_default() {
        let config = TrackerConfig::from_toml_str("[logging]\ndir = \"/tmp/tracker\"").unwrap();
        assert_eq!(config.logging.effective_level(), default_log_level());

        let explicit = LoggingConfig {
            level: Some("warn".to_string()),
            dir: None,
        };
        assert_eq!(explicit.effective_level(), "warn");
    }

    #[test]
    fn rejects_misspelled_label_keys() {
        let err = TrackerConfig::from_toml_str("[labels]\npinnned = \"Top\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_colliding_labels() {
        let err = TrackerConfig::from_toml_str(
            r#"
            [labels]
            pinned = "Misc"
            uncategorized = "Misc"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_relative_log_dir_and_unknown_keys() {
        let relative = TrackerConfig::from_toml_str("[logging]\ndir = \"logs\"").unwrap_err();
        assert!(matches!(relative, ConfigError::Invalid(_)));

        let unknown = TrackerConfig::from_toml_str("[storage]\npath = \"x\"").unwrap_err();
        assert!(matches!(unknown, ConfigError::Parse(_)));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
