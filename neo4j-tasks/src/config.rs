use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment as EnvSource, File, FileFormat};
use neo4j_core::{Distribution, Environment, EnvironmentValidator};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Prefix of environment variables overriding configuration keys
pub const ENV_PREFIX: &str = "NEO4J_TASKS";

const DEFAULTS: &str = include_str!("../config/default.toml");

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Environment name; empty or absent means no environment
    #[serde(default)]
    pub environment: Option<String>,
    pub install: InstallConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InstallConfig {
    /// Directory holding install directories and downloaded archives
    pub base_dir: PathBuf,
    /// Host serving distribution archives
    pub download_url: String,
    /// Edition installed when none is given on the command line
    pub edition: String,
    /// Version installed when none is given on the command line
    pub version: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl Config {
    fn env_source() -> EnvSource {
        EnvSource::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Load configuration from embedded defaults, `CONFIG_FILE` and environment variables
    pub fn from_env() -> Result<Self> {
        let mut builder = ConfigBuilder::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));

        // Add config file if specified
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(
                File::with_name(&config_file)
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        let config = builder
            .add_source(Self::env_source())
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load configuration from a specific file path, on top of the defaults
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Toml))
            .add_source(File::with_name(path).format(FileFormat::Toml))
            .add_source(Self::env_source());

        let config = builder
            .build()
            .with_context(|| format!("Failed to build configuration from file {path}"))?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration from file")
    }

    /// Parsed environment, `None` when unset or blank
    pub fn environment(&self) -> Result<Option<Environment>> {
        match self.environment.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => Ok(Some(name.parse::<Environment>()?)),
        }
    }

    /// Distribution to install when the command line names none
    pub fn default_distribution(&self) -> Distribution {
        Distribution::new(&self.install.edition, &self.install.version)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        if self.install.base_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("install.base_dir cannot be empty"));
        }

        EnvironmentValidator::validate_download_url(&self.install.download_url)?;
        self.environment()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: None,
            install: InstallConfig {
                base_dir: PathBuf::from("."),
                download_url: neo4j_core::DEFAULT_DOWNLOAD_URL.to_string(),
                edition: Distribution::DEFAULT_EDITION.to_string(),
                version: Distribution::DEFAULT_VERSION.to_string(),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                format: LogFormat::Compact,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.install.base_dir, PathBuf::from("."));
        assert_eq!(config.install.download_url, "http://dist.neo4j.org");
        assert_eq!(config.default_distribution(), Distribution::default());
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let config: Config = ConfigBuilder::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        let default = Config::default();

        assert_eq!(config.environment().unwrap(), None);
        assert_eq!(config.install.base_dir, default.install.base_dir);
        assert_eq!(config.install.download_url, default.install.download_url);
        assert_eq!(config.default_distribution(), default.default_distribution());
        assert_eq!(config.logging.format, default.logging.format);
    }

    #[test]
    fn test_environment_parsing() {
        let mut config = Config::default();
        assert_eq!(config.environment().unwrap(), None);

        config.environment = Some("  ".to_string());
        assert_eq!(config.environment().unwrap(), None);

        config.environment = Some("Test".to_string());
        assert_eq!(config.environment().unwrap(), Some(Environment::Test));

        config.environment = Some("../../etc".to_string());
        assert!(config.environment().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.install.download_url = "dist.neo4j.org".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.install.base_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
