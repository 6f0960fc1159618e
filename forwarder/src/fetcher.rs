use crate::config::Config;
use crate::errors::{ForwarderError, Result};
use http::StatusCode;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use url::Url;

/// Logs only become available upstream after this delay.
pub const INGESTION_DELAY: Duration = Duration::from_secs(30 * 60);

/// Length of the window pulled by one invocation.
pub const WINDOW_LENGTH: Duration = Duration::from_secs(60);

const AUTH_EMAIL_HEADER: &str = "X-Auth-Email";
const AUTH_KEY_HEADER: &str = "X-Auth-Key";

/// A `[start, end)` window in whole unix seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: u64,
    pub end: u64,
}

impl FetchWindow {
    /// The one minute window ending `INGESTION_DELAY` before `now`, aligned to
    /// the start of a minute.
    pub fn ending_before(now: SystemTime) -> Self {
        let now_secs = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let end = now_secs.saturating_sub(INGESTION_DELAY.as_secs());
        let end = end - end % 60;

        FetchWindow {
            start: end.saturating_sub(WINDOW_LENGTH.as_secs()),
            end,
        }
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Pulls raw request logs for a single zone.
#[derive(Clone)]
pub struct LogFetcher {
    client: reqwest::Client,
    base_url: Url,
    zone_id: String,
    auth_email: String,
    auth_key: String,
}

impl LogFetcher {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        LogFetcher {
            client,
            base_url: config.api_base_url.clone(),
            zone_id: config.zone_id.clone(),
            auth_email: config.auth_email.clone(),
            auth_key: config.auth_key.clone(),
        }
    }

    fn request_url(&self, window: FetchWindow) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| ForwarderError::InvalidSourceUrl(self.base_url.to_string()))?
            .clear()
            .extend(["client", "v4", "zones", self.zone_id.as_str(), "logs", "requests"]);

        url.query_pairs_mut()
            .append_pair("start", &window.start.to_string())
            .append_pair("end", &window.end.to_string());

        Ok(url)
    }

    /// Fetches the newline-delimited payload for `window`.
    ///
    /// Returns `None` when the API reports that there is nothing to fetch.
    pub async fn fetch(&self, window: FetchWindow) -> Result<Option<String>> {
        let url = self.request_url(window)?;
        debug!(zone_id = %self.zone_id, %window, "Fetching request logs");

        let response = self
            .client
            .get(url)
            .header(AUTH_EMAIL_HEADER, &self.auth_email)
            .header(AUTH_KEY_HEADER, &self.auth_key)
            .send()
            .await
            .map_err(ForwarderError::FetchFailed)?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                debug!(zone_id = %self.zone_id, %window, "No logs in window");
                Ok(None)
            }
            status => {
                if status != StatusCode::OK {
                    warn!(
                        zone_id = %self.zone_id,
                        status = status.as_u16(),
                        "Unexpected status from log API, treating body as payload"
                    );
                }
                let body = response.text().await.map_err(ForwarderError::FetchBody)?;
                Ok(Some(body))
            }
        }
    }
}
