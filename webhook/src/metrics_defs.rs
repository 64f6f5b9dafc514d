use shared::metrics_defs::{MetricDef, MetricType};

pub const EVENTS_RECEIVED: MetricDef = MetricDef {
    name: "events.received",
    metric_type: MetricType::Counter,
    description: "Slack event callbacks received. Tagged with kind.",
};

pub const COMMANDS_RECEIVED: MetricDef = MetricDef {
    name: "commands.received",
    metric_type: MetricType::Counter,
    description: "Slash command invocations received. Tagged with command.",
};

pub const MESSAGES_DELIVERED: MetricDef = MetricDef {
    name: "messages.delivered",
    metric_type: MetricType::Counter,
    description: "Messages posted to Slack channels. Tagged with status.",
};

pub const BACKGROUND_TASKS_INFLIGHT: MetricDef = MetricDef {
    name: "background_tasks.inflight",
    metric_type: MetricType::Gauge,
    description: "Number of background tasks currently running",
};

pub const BACKGROUND_TASK_OUTCOMES: MetricDef = MetricDef {
    name: "background_tasks.outcome",
    metric_type: MetricType::Counter,
    description: "Finished background tasks. Tagged with task, outcome.",
};

pub const ALL_METRICS: &[MetricDef] = &[
    EVENTS_RECEIVED,
    COMMANDS_RECEIVED,
    MESSAGES_DELIVERED,
    BACKGROUND_TASKS_INFLIGHT,
    BACKGROUND_TASK_OUTCOMES,
];
