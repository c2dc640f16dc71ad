//! Configuration loading for achilles.
//!
//! Layered config: defaults -> config file -> explicit file -> env vars.
//! The default config file lives at ~/.config/achilles/config.{toml,yaml,json}.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::counter::{CounterProfile, CounterRegistry};
use crate::error::MappingError;

/// Main settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the counter store directory
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Which counter table layout to use
    #[serde(default)]
    pub counter_profile: CounterProfile,

    /// Log level (trace, debug, info, warn, error).
    ///
    /// Not read by the library; the host binary feeds it to its tracing
    /// subscriber's filter.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_db_path() -> String {
    ProjectDirs::from("", "", "achilles")
        .map(|p| p.data_local_dir().join("counters"))
        .unwrap_or_else(|| PathBuf::from("./counters"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            counter_profile: CounterProfile::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/achilles/config)
    /// 3. Explicit config file (optional, must exist when given)
    /// 4. Environment variables (ACHILLES_DB_PATH, ACHILLES_COUNTER_PROFILE, ...)
    pub fn load(config_path: Option<&str>) -> Result<Self, MappingError> {
        let config_dir = ProjectDirs::from("", "", "achilles")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())
            .map_err(|e| MappingError::Config(e.to_string()))?
            .set_default("counter_profile", CounterProfile::default().to_string())
            .map_err(|e| MappingError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| MappingError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("ACHILLES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| MappingError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| MappingError::Config(e.to_string()))
    }

    /// Registry for the configured counter profile
    pub fn counter_registry(&self) -> CounterRegistry {
        CounterRegistry::new(self.counter_profile)
    }

    /// Expand ~ in db_path to the home directory
    pub fn expanded_db_path(&self) -> PathBuf {
        if let Some(rest) = self.db_path.strip_prefix("~/") {
            if let Some(home) = directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf()) {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.counter_profile, CounterProfile::Cql);
        assert_eq!(settings.log_level, "info");
        assert_eq!(
            settings.counter_registry().schema().table_name,
            "achilles_counter_table"
        );
    }

    #[test]
    fn test_load_with_defaults() {
        let settings = Settings::load(None).unwrap();
        assert!(!settings.db_path.is_empty());
    }

    #[test]
    fn test_load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("achilles.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "counter_profile = \"thrift\"").unwrap();
        writeln!(file, "db_path = \"/var/lib/achilles\"").unwrap();

        let settings = Settings::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(settings.counter_profile, CounterProfile::Thrift);
        assert_eq!(settings.db_path, "/var/lib/achilles");
        assert_eq!(
            settings.counter_registry().schema().table_name,
            "achillesCounterCF"
        );
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = Settings::load(Some("/nonexistent/achilles/settings.toml"));
        assert!(matches!(result, Err(MappingError::Config(_))));
    }

    #[test]
    fn test_expanded_db_path_without_tilde() {
        let settings = Settings {
            db_path: "/data/counters".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.expanded_db_path(), PathBuf::from("/data/counters"));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"counter_profile\":\"cql\""));
    }
}
