use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::endpoint::SumoEndpoint;
use crate::errors::Result;
use crate::fetcher::{FetchWindow, LogFetcher};
use crate::grouper::group_payload;
use crate::keyer::MetadataKeyer;
use crate::metrics_defs::{INVOCATION_DURATION, RECORDS_FETCHED};
use shared::{counter, histogram};
use std::time::{Instant, SystemTime};
use tracing::info;

/// Summary of a successful invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InvocationReport {
    pub records: usize,
    pub groups: usize,
}

/// One fetch, group and forward cycle. Holds no state between runs.
pub struct Invocation {
    config: Config,
    client: reqwest::Client,
}

impl Invocation {
    pub fn new(config: Config) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: Config, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub async fn run(&self) -> Result<InvocationReport> {
        self.run_at(SystemTime::now()).await
    }

    /// Runs against the window derived from `now`.
    pub async fn run_at(&self, now: SystemTime) -> Result<InvocationReport> {
        let endpoint = SumoEndpoint::parse(&self.config.sumo_endpoint)?;
        self.execute(endpoint, FetchWindow::ending_before(now)).await
    }

    pub(crate) async fn execute(
        &self,
        endpoint: SumoEndpoint,
        window: FetchWindow,
    ) -> Result<InvocationReport> {
        let start = Instant::now();
        let result = self.forward(endpoint, window).await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        histogram!(INVOCATION_DURATION, "outcome" => outcome)
            .record(start.elapsed().as_secs_f64());

        result
    }

    async fn forward(
        &self,
        endpoint: SumoEndpoint,
        window: FetchWindow,
    ) -> Result<InvocationReport> {
        let fetcher = LogFetcher::new(self.client.clone(), &self.config);
        let Some(payload) = fetcher.fetch(window).await? else {
            info!(zone_id = %self.config.zone_id, %window, "No logs to forward");
            return Ok(InvocationReport::default());
        };

        let keyer = MetadataKeyer::from_config(&self.config);
        let batches = group_payload(&payload, &keyer)?;
        let report = InvocationReport {
            records: batches.record_count(),
            groups: batches.len(),
        };
        counter!(RECORDS_FETCHED).increment(report.records as u64);

        let dispatcher = Dispatcher::new(self.client.clone(), endpoint);
        dispatcher.dispatch(batches).await.into_result()?;

        info!(
            zone_id = %self.config.zone_id,
            %window,
            records = report.records,
            groups = report.groups,
            "Forwarded request logs"
        );
        Ok(report)
    }
}
