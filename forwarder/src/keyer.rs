//! Routing metadata attached to outbound batches.

use crate::config::Config;
use serde_json::Value as JsonValue;
use std::fmt;

/// Configured value that disables an override.
const DISABLED: &str = "none";

/// The (name, category, host) triple used by the collector to route a batch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutingKey {
    pub name: String,
    pub category: String,
    pub host: String,
}

impl RoutingKey {
    pub fn new<N, C, H>(name: N, category: C, host: H) -> Self
    where
        N: Into<String>,
        C: Into<String>,
        H: Into<String>,
    {
        RoutingKey {
            name: name.into(),
            category: category.into(),
            host: host.into(),
        }
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.category, self.host)
    }
}

/// Assigns a routing key to each log record.
pub trait RecordKeyer {
    fn key_for(&self, record: &JsonValue) -> RoutingKey;
}

/// Keys every record from the static source overrides.
#[derive(Clone, Debug)]
pub struct MetadataKeyer {
    category: Option<String>,
    host: Option<String>,
    name: Option<String>,
    zone_id: String,
}

impl MetadataKeyer {
    pub fn new(
        category: Option<String>,
        host: Option<String>,
        name: Option<String>,
        zone_id: impl Into<String>,
    ) -> Self {
        MetadataKeyer {
            category,
            host,
            name,
            zone_id: zone_id.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.source_category_override.clone(),
            config.source_host_override.clone(),
            config.source_name_override.clone(),
            config.zone_id.clone(),
        )
    }
}

impl RecordKeyer for MetadataKeyer {
    fn key_for(&self, _record: &JsonValue) -> RoutingKey {
        metadata_key(
            self.category.as_deref(),
            self.host.as_deref(),
            self.name.as_deref(),
            &self.zone_id,
        )
    }
}

/// Resolves the routing key from the configured overrides.
///
/// Each override is dropped to an empty string when it is absent, empty or
/// `"none"`. An absent or empty name falls back to the zone identifier.
pub fn metadata_key(
    category: Option<&str>,
    host: Option<&str>,
    name: Option<&str>,
    zone_id: &str,
) -> RoutingKey {
    let name = match name {
        None | Some("") => Some(zone_id),
        other => other,
    };

    RoutingKey::new(enabled(name), enabled(category), enabled(host))
}

fn enabled(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() && v != DISABLED => v,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let key = metadata_key(None, None, None, "zone123");
        assert_eq!(key, RoutingKey::new("zone123", "", ""));
        assert_eq!(key.to_string(), "zone123::");
    }

    #[test]
    fn test_overrides() {
        let key = metadata_key(
            Some("cdn/requests"),
            Some("api.cloudflare.com"),
            Some("edge"),
            "zone123",
        );
        assert_eq!(key.to_string(), "edge:cdn/requests:api.cloudflare.com");
    }

    #[test]
    fn test_disabled_sentinel() {
        let key = metadata_key(Some("none"), Some("none"), Some("none"), "zone123");
        assert_eq!(key, RoutingKey::new("", "", ""));

        let key = metadata_key(Some(""), Some(""), Some(""), "zone123");
        assert_eq!(key, RoutingKey::new("zone123", "", ""));
    }

    #[test]
    fn test_keyer_ignores_record_content() {
        let keyer = MetadataKeyer::new(Some("cat".into()), None, None, "zone123");
        let first = keyer.key_for(&json!({"timestamp": 1, "clientIp": "10.0.0.1"}));
        let second = keyer.key_for(&json!({"timestamp": 2, "clientIp": "10.0.0.2"}));
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "zone123:cat:");
    }
}
