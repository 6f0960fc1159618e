//! Drives invocations of the forwarder.

use forwarder::config::Config;
use forwarder::errors::ForwarderError;
use forwarder::{Invocation, InvocationReport};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

/// Runs a single invocation and logs its outcome.
pub async fn run_once(config: &Config) -> Result<InvocationReport, ForwarderError> {
    let result = Invocation::new(config.clone()).run().await;

    match &result {
        Ok(report) => tracing::info!(
            records = report.records,
            groups = report.groups,
            "Invocation succeeded"
        ),
        Err(e) => tracing::error!(error = %e, "Invocation failed"),
    }

    result
}

/// Triggers an independent invocation every `period` until `shutdown` resolves.
///
/// A failed invocation does not stop the schedule.
pub async fn run_schedule<F>(config: &Config, period: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    tracing::info!(
        zone_id = %config.zone_id,
        period_secs = period.as_secs(),
        "Starting schedule"
    );

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Schedule stopped");
                break;
            }
            _ = ticker.tick() => {
                let _ = run_once(config).await;
            }
        }
    }
}
