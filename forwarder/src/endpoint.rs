use crate::errors::{ForwarderError, Result};
use url::Url;

/// A validated collector endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct SumoEndpoint {
    url: Url,
}

impl SumoEndpoint {
    /// Accepts only `https` URLs with a non-empty host and path.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || ForwarderError::InvalidEndpoint(raw.to_string());

        let url = Url::parse(raw).map_err(|_| invalid())?;

        if url.scheme() != "https" {
            return Err(invalid());
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid());
        }
        if url.path().is_empty() {
            return Err(invalid());
        }

        Ok(SumoEndpoint { url })
    }

    /// Skips the scheme check so tests can talk to a plain HTTP server.
    #[cfg(test)]
    pub(crate) fn insecure(url: Url) -> Self {
        SumoEndpoint { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}
