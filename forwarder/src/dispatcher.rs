//! Concurrent delivery of batches to the collector.
//!
//! Every group is posted by its own task. The dispatcher waits for all of
//! them to resolve before the outcome of the invocation is decided.

use crate::endpoint::SumoEndpoint;
use crate::errors::{DeliveryError, ForwarderError, Result};
use crate::grouper::BatchGroup;
use crate::keyer::RoutingKey;
use crate::metrics_defs::{GROUPS_DISPATCHED, GROUPS_FAILED};
use http::StatusCode;
use serde_json::Value as JsonValue;
use shared::counter;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

const SUMO_NAME_HEADER: &str = "X-Sumo-Name";
const SUMO_CATEGORY_HEADER: &str = "X-Sumo-Category";
const SUMO_HOST_HEADER: &str = "X-Sumo-Host";

/// Aggregated outcome of one dispatch round.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    /// Groups acknowledged with a 200.
    pub sent: usize,
    pub errors: Vec<DeliveryError>,
}

impl DeliveryReport {
    /// Number of sent groups, or every collected error.
    pub fn into_result(self) -> Result<usize> {
        if self.errors.is_empty() {
            Ok(self.sent)
        } else {
            Err(ForwarderError::Delivery(
                self.errors.iter().map(ToString::to_string).collect(),
            ))
        }
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
    endpoint: SumoEndpoint,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client, endpoint: SumoEndpoint) -> Self {
        Self { client, endpoint }
    }

    /// Posts every group concurrently and waits until all have resolved.
    pub async fn dispatch(&self, batches: BatchGroup) -> DeliveryReport {
        debug!(
            host = self.endpoint.host(),
            path = self.endpoint.path(),
            groups = batches.len(),
            "Dispatching groups"
        );
        let mut join_set = JoinSet::new();

        for (key, records) in batches {
            let client = self.client.clone();
            let url = self.endpoint.url().clone();

            join_set.spawn(async move {
                let result = deliver(&client, &url, &key, &records).await;
                (key, records.len(), result)
            });
        }

        let mut report = DeliveryReport::default();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((key, records, Ok(()))) => {
                    debug!(routing_key = %key, records, "Group delivered");
                    counter!(GROUPS_DISPATCHED).increment(1);
                    report.sent += 1;
                }
                Ok((key, records, Err(e))) => {
                    warn!(routing_key = %key, records, error = %e, "Group delivery failed");
                    counter!(GROUPS_FAILED).increment(1);
                    report.errors.push(e);
                }
                Err(e) => {
                    error!(error = %e, "Delivery task panicked");
                    counter!(GROUPS_FAILED).increment(1);
                    report.errors.push(DeliveryError::TaskFailed(e.to_string()));
                }
            }
        }

        report
    }
}

/// Serializes records as newline-delimited JSON.
pub fn encode_ndjson(records: &[JsonValue]) -> Vec<u8> {
    let mut body = String::new();
    for record in records {
        body.push_str(&record.to_string());
        body.push('\n');
    }
    body.into_bytes()
}

async fn deliver(
    client: &reqwest::Client,
    url: &url::Url,
    key: &RoutingKey,
    records: &[JsonValue],
) -> std::result::Result<(), DeliveryError> {
    let body = encode_ndjson(records);

    let response = client
        .post(url.clone())
        .header(SUMO_NAME_HEADER, &key.name)
        .header(SUMO_CATEGORY_HEADER, &key.category)
        .header(SUMO_HOST_HEADER, &key.host)
        .body(body)
        .send()
        .await
        .map_err(|e| DeliveryError::Transport(e.to_string()))?;

    match response.status() {
        StatusCode::OK => Ok(()),
        status => Err(DeliveryError::Status(status)),
    }
}
