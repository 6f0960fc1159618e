//! Splits a fetched payload into per-routing-key batches.

use crate::errors::{ForwarderError, Result};
use crate::keyer::{RecordKeyer, RoutingKey};
use crate::normalize::normalize;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Normalized records grouped by routing key.
///
/// Keys iterate in first-seen order; records within a key keep payload order.
#[derive(Debug, Default)]
pub struct BatchGroup {
    groups: IndexMap<RoutingKey, Vec<JsonValue>>,
}

impl BatchGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: RoutingKey, record: JsonValue) {
        self.groups.entry(key).or_default().push(record);
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &RoutingKey) -> Option<&[JsonValue]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> impl Iterator<Item = &RoutingKey> {
        self.groups.keys()
    }
}

impl IntoIterator for BatchGroup {
    type Item = (RoutingKey, Vec<JsonValue>);
    type IntoIter = indexmap::map::IntoIter<RoutingKey, Vec<JsonValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Parses every non-empty line of `payload`, normalizes it and files it
/// under the key assigned by `keyer`.
///
/// A single trailing `\r` is dropped so CRLF payloads work. Any other line,
/// whitespace-only lines included, must be valid JSON or the whole payload
/// fails.
pub fn group_payload<K>(payload: &str, keyer: &K) -> Result<BatchGroup>
where
    K: RecordKeyer + ?Sized,
{
    let mut batches = BatchGroup::new();

    for (index, line) in payload.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }

        let record: JsonValue =
            serde_json::from_str(line).map_err(|source| ForwarderError::MalformedRecord {
                line: index + 1,
                source,
            })?;
        let record = normalize(record);
        let key = keyer.key_for(&record);
        batches.push(key, record);
    }

    Ok(batches)
}
