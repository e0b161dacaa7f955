//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve the database file location and logging settings once at
//!   startup so they can be passed explicitly to the components that need
//!   them.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - `log_dir`, when present, is absolute.

use crate::logging::{default_log_level, LogLevel, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "TODOLIST_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TODOLIST_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TODOLIST_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "todolist.sqlite3";

/// Invalid configuration value.
#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(LoggingError),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(err) => write!(f, "{LOG_LEVEL_ENV}: {err}"),
            Self::RelativeLogDir(dir) => write!(
                f,
                "{LOG_DIR_ENV} must be an absolute path, got `{}`",
                dir.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(err) => Some(err),
            Self::RelativeLogDir(_) => None,
        }
    }
}

/// Settings needed to bootstrap the store and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves only the database path from the process environment.
    ///
    /// Never fails, so a bad logging variable cannot block storage access.
    pub fn db_path_from_env() -> PathBuf {
        Self::db_path_from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves only the database path through `lookup`.
    pub fn db_path_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        lookup(DB_PATH_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }

    /// Resolves configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = Self::db_path_from_lookup(&lookup);

        let log_level = match non_blank(LOG_LEVEL_ENV) {
            Some(value) => LogLevel::parse(&value).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = non_blank(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(dir) = &log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, CoreConfig, DB_PATH_ENV, DEFAULT_DB_FILE_NAME, LOG_DIR_ENV, LOG_LEVEL_ENV,
    };
    use crate::logging::{default_log_level, LogLevel};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(vars: &[(&str, &str)]) -> Result<CoreConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config.db_path, std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = resolve(&[(DB_PATH_ENV, "   "), (LOG_LEVEL_ENV, "")]).unwrap();
        assert_eq!(config.db_path, std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn explicit_values_are_used() {
        let log_dir = std::env::temp_dir().join("todolist-logs");
        let config = resolve(&[
            (DB_PATH_ENV, " /data/todo.sqlite3 "),
            (LOG_LEVEL_ENV, "Warning"),
            (LOG_DIR_ENV, log_dir.to_str().unwrap()),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/data/todo.sqlite3"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn invalid_level_and_relative_log_dir_are_rejected() {
        let err = resolve(&[(LOG_LEVEL_ENV, "loud")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
        assert!(err.to_string().contains(LOG_LEVEL_ENV));

        let err = resolve(&[(LOG_DIR_ENV, "logs")]).unwrap_err();
        assert!(matches!(err, ConfigError::RelativeLogDir(_)));
    }

    #[test]
    fn db_path_resolves_even_when_logging_variables_are_invalid() {
        let vars: HashMap<&str, &str> = [
            (DB_PATH_ENV, "/data/todo.sqlite3"),
            (LOG_LEVEL_ENV, "verbose"),
            (LOG_DIR_ENV, "relative/logs"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| vars.get(key).map(|value| value.to_string());

        assert!(CoreConfig::from_lookup(lookup).is_err());
        assert_eq!(
            CoreConfig::db_path_from_lookup(lookup),
            PathBuf::from("/data/todo.sqlite3")
        );
        assert_eq!(
            CoreConfig::db_path_from_lookup(|_: &str| None),
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        );
    }
}
