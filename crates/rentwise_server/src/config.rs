//! Environment-driven server configuration.
//!
//! Values come from process environment variables, with a `.env` file in the
//! working directory loaded first when present. Every key has a default
//! except the CORS origin, which is optional.
//!
//! Loading happens before logging starts, so nothing is logged here. Keys
//! that fell back to defaults are recorded and reported by `log_summary`
//! once the logger is up; invalid values surface as `ConfigError`.

use axum::http::HeaderValue;
use dotenv::dotenv;
use log::info;
use rentwise_core::default_log_level;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_PATH: &str = "rentwise.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot resolve working directory: {0}")]
    WorkingDirectory(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rotated log files.
    pub log_dir: PathBuf,
    /// Allowed CORS origin; `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    /// Keys that were unset or blank and took their default.
    pub defaulted: Vec<&'static str>,
}

impl Config {
    /// Loads `.env` if present, then reads `RENTWISE_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        let cwd = env::current_dir()?;
        Self::from_lookup(&cwd, |key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Relative paths resolve
    /// against `cwd`.
    pub fn from_lookup(
        cwd: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut defaulted = Vec::new();
        let mut read = |key: &'static str| {
            let value = lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty());
            if value.is_none() {
                defaulted.push(key);
            }
            value
        };

        let port = match read("RENTWISE_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|err| invalid("RENTWISE_PORT", &value, err.to_string()))?,
            None => DEFAULT_PORT,
        };

        let db_path = read("RENTWISE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let log_level = read("RENTWISE_LOG_LEVEL")
            .unwrap_or_else(|| default_log_level().to_string());

        let log_dir = read("RENTWISE_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR_NAME));
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            cwd.join(log_dir)
        };

        let cors_origin = read("RENTWISE_CORS_ORIGIN")
            .map(|value| {
                HeaderValue::from_str(&value)
                    .map_err(|err| invalid("RENTWISE_CORS_ORIGIN", &value, err.to_string()))
            })
            .transpose()?;

        Ok(Self {
            port,
            db_path,
            log_level,
            log_dir,
            cors_origin,
            defaulted,
        })
    }

    /// Logs the effective settings. Call after `init_logging`.
    pub fn log_summary(&self) {
        info!(
            "event=config_loaded module=config status=ok port={} db_path={} log_level={} log_dir={} cors_origin={}",
            self.port,
            self.db_path.display(),
            self.log_level,
            self.log_dir.display(),
            self.cors_origin
                .as_ref()
                .and_then(|origin| origin.to_str().ok())
                .unwrap_or("*")
        );
        for key in &self.defaulted {
            info!("event=config_default module=config status=ok key={key}");
        }
    }
}

fn invalid(key: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError};
    use std::collections::HashMap;
    use std::path::Path;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(Path::new("/srv/rentwise"), |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, Path::new("rentwise.sqlite3"));
        assert_eq!(config.log_dir, Path::new("/srv/rentwise/logs"));
        assert!(config.cors_origin.is_none());
        assert_eq!(
            config.defaulted,
            vec![
                "RENTWISE_PORT",
                "RENTWISE_DB_PATH",
                "RENTWISE_LOG_LEVEL",
                "RENTWISE_LOG_DIR",
                "RENTWISE_CORS_ORIGIN",
            ]
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = load(&[
            ("RENTWISE_PORT", "8080"),
            ("RENTWISE_DB_PATH", "/data/rent.db"),
            ("RENTWISE_LOG_LEVEL", "warn"),
            ("RENTWISE_LOG_DIR", "/var/log/rentwise"),
            ("RENTWISE_CORS_ORIGIN", "http://localhost:3000"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_path, Path::new("/data/rent.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Path::new("/var/log/rentwise"));
        assert_eq!(
            config.cors_origin.as_ref().and_then(|value| value.to_str().ok()),
            Some("http://localhost:3000")
        );
        assert!(config.defaulted.is_empty());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("RENTWISE_PORT", "  "), ("RENTWISE_LOG_LEVEL", "error")]).unwrap();
        assert_eq!(config.port, 5000);
        assert!(config.defaulted.contains(&"RENTWISE_PORT"));
        assert!(!config.defaulted.contains(&"RENTWISE_LOG_LEVEL"));
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = load(&[("RENTWISE_PORT", "eighty")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "RENTWISE_PORT",
                ..
            }
        ));
    }
}
