use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.cloudflare.com";

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Zone identifier cannot be empty")]
    EmptyZoneId,

    #[error("Source API credential {0} cannot be empty")]
    EmptyCredential(&'static str),

    #[error("Source API base URL must be http or https: {0}")]
    UnsupportedApiScheme(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// Forwarder configuration, loaded once at process start.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Destination collector URL. Validated at the start of every invocation.
    pub sumo_endpoint: String,
    pub zone_id: String,
    pub auth_email: String,
    pub auth_key: String,
    #[serde(default)]
    pub source_category_override: Option<String>,
    #[serde(default)]
    pub source_host_override: Option<String>,
    #[serde(default)]
    pub source_name_override: Option<String>,
    /// Base URL of the log retrieval API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: Url,
}

#[allow(clippy::expect_used)]
fn default_api_base_url() -> Url {
    Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid")
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVar(name));

        let api_base_url = match lookup("CLOUDFLARE_API_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::InvalidVar {
                name: "CLOUDFLARE_API_BASE_URL",
                reason: e.to_string(),
            })?,
            None => default_api_base_url(),
        };

        let config = Config {
            sumo_endpoint: required("SUMO_ENDPOINT")?,
            zone_id: required("CLOUDFLARE_ZONE_ID")?,
            auth_email: required("CLOUDFLARE_AUTH_EMAIL")?,
            auth_key: required("CLOUDFLARE_AUTH_KEY")?,
            source_category_override: lookup("SOURCE_CATEGORY_OVERRIDE"),
            source_host_override: lookup("SOURCE_HOST_OVERRIDE"),
            source_name_override: lookup("SOURCE_NAME_OVERRIDE"),
            api_base_url,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.zone_id.is_empty() {
            return Err(ValidationError::EmptyZoneId);
        }
        if self.auth_email.is_empty() {
            return Err(ValidationError::EmptyCredential("auth_email"));
        }
        if self.auth_key.is_empty() {
            return Err(ValidationError::EmptyCredential("auth_key"));
        }
        if !matches!(self.api_base_url.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedApiScheme(
                self.api_base_url.to_string(),
            ));
        }
        Ok(())
    }
}
