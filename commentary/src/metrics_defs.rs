use shared::metrics_defs::{MetricDef, MetricType};

pub const COMPLETION_DURATION: MetricDef = MetricDef {
    name: "completion.duration",
    metric_type: MetricType::Histogram,
    description: "Completion API round trip in seconds. Tagged with purpose.",
};

pub const COMPLETION_FAILURES: MetricDef = MetricDef {
    name: "completion.failures",
    metric_type: MetricType::Counter,
    description: "Number of failed completion requests. Tagged with purpose.",
};

pub const ALL_METRICS: &[MetricDef] = &[COMPLETION_DURATION, COMPLETION_FAILURES];
