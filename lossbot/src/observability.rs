use crate::config::CommonConfig;
use metrics_exporter_statsd::StatsdBuilder;
use shared::metrics_defs::describe_all;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const METRICS_PREFIX: &str = "lossbot";

#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("could not create statsd recorder: {0}")]
    Statsd(#[from] metrics_exporter_statsd::StatsdError),
    #[error("could not install metrics recorder: {0}")]
    Recorder(String),
}

/// Keeps the Sentry client alive; events are flushed when it is dropped.
pub struct Guard {
    _sentry: Option<sentry::ClientInitGuard>,
}

/// Installs the tracing subscriber, Sentry and the statsd metrics recorder.
pub fn init(common: &CommonConfig) -> Result<Guard, ObservabilityError> {
    let sentry = common.logging.as_ref().map(|logging| {
        sentry::init((
            logging.sentry_dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry.as_ref().map(|_| sentry::integrations::tracing::layer()))
        .init();

    if let Some(metrics) = &common.metrics {
        let recorder = StatsdBuilder::from(metrics.statsd_host.clone(), metrics.statsd_port)
            .build(Some(METRICS_PREFIX))?;
        metrics::set_global_recorder(recorder)
            .map_err(|err| ObservabilityError::Recorder(err.to_string()))?;

        describe_all(actuarial::metrics_defs::ALL_METRICS);
        describe_all(commentary::metrics_defs::ALL_METRICS);
        describe_all(webhook::metrics_defs::ALL_METRICS);
        tracing::info!(
            host = %metrics.statsd_host,
            port = metrics.statsd_port,
            "Sending metrics to statsd"
        );
    }

    if sentry.is_some() {
        tracing::info!("Sentry error reporting enabled");
    }

    Ok(Guard { _sentry: sentry })
}
