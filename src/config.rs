use crate::fov::{FovOptions, RangeFilter, MAX_FOV_RADIUS};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fov: FovConfig,
    #[serde(default)]
    pub observer: ObserverConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct FovConfig {
    #[serde(default = "default_max_radius")]
    pub max_radius: i32,
    #[serde(default = "default_radius")]
    pub radius: i32,
    #[serde(default)]
    pub range: RangeFilter,
}

/// Overrides the observer marked in the layout file
#[derive(Debug, Default, Deserialize)]
pub struct ObserverConfig {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_layout_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_query_log: bool,
    #[serde(default = "default_query_log_path")]
    pub query_log_path: String,
    /// tracing filter directive, e.g. "info" or "digital_fov=trace"
    #[serde(default = "default_filter")]
    pub filter: String,
}

// Default values
fn default_max_radius() -> i32 { MAX_FOV_RADIUS }
fn default_radius() -> i32 { MAX_FOV_RADIUS }
fn default_layout_path() -> String { "layouts/default.txt".to_string() }
fn default_query_log_path() -> String { "query_log.json".to_string() }
fn default_filter() -> String { "info".to_string() }

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            max_radius: default_max_radius(),
            radius: default_radius(),
            range: RangeFilter::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            path: default_layout_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_query_log: false,
            query_log_path: default_query_log_path(),
            filter: default_filter(),
        }
    }
}

impl FovConfig {
    pub fn options(&self) -> FovOptions {
        FovOptions {
            max_radius: self.max_radius,
            range: self.range,
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if the file
    /// doesn't exist or can't be parsed
    pub fn load() -> Self {
        if !Path::new("config.toml").exists() {
            println!("No config.toml found, using default configuration");
            return Config::default();
        }
        match Self::from_path("config.toml") {
            Ok(config) => {
                println!("Loaded configuration from config.toml");
                config
            }
            Err(e) => {
                eprintln!("Warning: {}", e);
                eprintln!("Using default configuration");
                Config::default()
            }
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_str(&contents)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.fov.max_radius, 7);
        assert_eq!(config.fov.radius, 7);
        assert_eq!(config.fov.range, RangeFilter::ChebyshevExclusive);
        assert_eq!(config.observer.x, None);
        assert_eq!(config.layout.path, "layouts/default.txt");
        assert!(!config.logging.enable_query_log);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_str(
            r#"
            [fov]
            radius = 4
            range = "euclidean"

            [observer]
            x = 3

            [logging]
            enable_query_log = true
            "#,
        )
        .unwrap();
        assert_eq!(config.fov.radius, 4);
        assert_eq!(config.fov.max_radius, 7);
        assert_eq!(config.fov.options().range, RangeFilter::Euclidean);
        assert_eq!(config.observer.x, Some(3));
        assert_eq!(config.observer.y, None);
        assert_eq!(config.logging.query_log_path, "query_log.json");
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(matches!(Config::from_str("[fov]\nradius = \"far\""), Err(ConfigError::Parse(_))));
        assert!(matches!(Config::from_path("does/not/exist.toml"), Err(ConfigError::Io { .. })));
    }
}
