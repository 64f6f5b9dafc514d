//! Metrics definitions for the ratio calculator.

use shared::metrics_defs::{MetricDef, MetricType};

pub const ANALYSIS_DURATION: MetricDef = MetricDef {
    name: "analysis.duration",
    metric_type: MetricType::Histogram,
    description: "Time to load a workbook and compute its loss ratio in seconds. Tagged with source.",
};

pub const ANALYSIS_FAILURES: MetricDef = MetricDef {
    name: "analysis.failures",
    metric_type: MetricType::Counter,
    description: "Number of analyses that produced an error. Tagged with kind.",
};

pub const ALL_METRICS: &[MetricDef] = &[ANALYSIS_DURATION, ANALYSIS_FAILURES];
