use shared::metrics_defs::{MetricDef, MetricType};

pub const RECORDS_FETCHED: MetricDef = MetricDef {
    name: "records.fetched",
    metric_type: MetricType::Counter,
    description: "Number of log records pulled from the source API",
};

pub const GROUPS_DISPATCHED: MetricDef = MetricDef {
    name: "groups.dispatched",
    metric_type: MetricType::Counter,
    description: "Number of groups accepted by the collector",
};

pub const GROUPS_FAILED: MetricDef = MetricDef {
    name: "groups.failed",
    metric_type: MetricType::Counter,
    description: "Number of groups that could not be delivered",
};

pub const INVOCATION_DURATION: MetricDef = MetricDef {
    name: "invocation.duration",
    metric_type: MetricType::Histogram,
    description: "Invocation duration in seconds. Tagged with outcome.",
};

pub const ALL_METRICS: &[MetricDef] = &[
    RECORDS_FETCHED,
    GROUPS_DISPATCHED,
    GROUPS_FAILED,
    INVOCATION_DURATION,
];
