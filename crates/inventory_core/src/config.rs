//! Runtime configuration loading.
//!
//! # Responsibility
//! - Merge an optional config file with `INVENTORY__*` environment
//!   variables into one [`CatalogConfig`].
//!
//! # Invariants
//! - Environment values override file values.
//! - Every field has a default, so an empty environment yields a usable
//!   configuration.

use crate::logging::default_log_level;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Environment prefix for configuration overrides.
pub const ENV_PREFIX: &str = "INVENTORY";
/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "inventory";

/// Settings shared by every catalog front end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// SQLite database file path.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_level")]
    pub log_level: String,
    /// Absolute log directory; file logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Actor recorded in audit fields when the caller names none.
    #[serde(default = "default_actor")]
    pub default_actor: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_level: default_level(),
            log_dir: None,
            default_actor: default_actor(),
        }
    }
}

fn default_database_path() -> String {
    "inventory.db".to_string()
}

fn default_level() -> String {
    default_log_level().to_string()
}

fn default_actor() -> String {
    "system".to_string()
}

impl CatalogConfig {
    /// Loads configuration from `path` (or `./inventory.{toml,json,..}` when
    /// absent) and the process environment.
    ///
    /// # Errors
    /// - Returns an error when an explicit `path` does not exist.
    /// - Returns an error when a source cannot be parsed or a value has the
    ///   wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogConfig, ENV_PREFIX};
    use config::Environment;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(Some(map))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_sources_yield_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = CatalogConfig::load_with_env(Some(&path), env(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn file_values_are_read() {
        let file = toml_file(
            "database_path = \"/var/lib/inventory/catalog.db\"\nlog_level = \"warn\"\ndefault_actor = \"importer\"\n",
        );
        let config = CatalogConfig::load_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.database_path, "/var/lib/inventory/catalog.db");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.default_actor, "importer");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file("database_path = \"from-file.db\"\n");
        let config = CatalogConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("INVENTORY__DATABASE_PATH", "from-env.db"),
                ("INVENTORY__LOG_DIR", "/tmp/inventory-logs"),
            ]),
        )
        .unwrap();
        assert_eq!(config.database_path, "from-env.db");
        assert_eq!(config.log_dir.as_deref(), Some("/tmp/inventory-logs"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(CatalogConfig::load_with_env(Some(&missing), env(&[])).is_err());
    }
}
