//! Pulls request logs for a zone and forwards them to a log collector.
//!
//! An [`Invocation`] fetches one window of logs, normalizes and groups the
//! records by routing key, then posts every group concurrently and reports
//! success only once all of them have been accepted.

pub mod config;
pub mod dispatcher;
pub mod endpoint;
pub mod errors;
pub mod fetcher;
pub mod grouper;
pub mod invocation;
pub mod keyer;
pub mod metrics_defs;
pub mod normalize;

#[cfg(test)]
mod testutils;

pub use invocation::{Invocation, InvocationReport};
