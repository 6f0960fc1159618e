use forwarder::config::{Config as ForwarderConfig, ConfigError as ForwarderConfigError};
use serde::Deserialize;
use shared::logging::LoggingConfig;
use shared::metrics::MetricsConfig;
use std::fs::File;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub forwarder: ForwarderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub metrics: Option<MetricsConfig>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config
            .forwarder
            .validate()
            .map_err(ForwarderConfigError::from)?;

        Ok(config)
    }

    /// Forwarder settings from the environment, everything else defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            forwarder: ForwarderConfig::from_env()?,
            logging: LoggingConfig::default(),
            metrics: None,
        })
    }

    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error(transparent)]
    Forwarder(#[from] ForwarderConfigError),
}
