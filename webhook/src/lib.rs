//! Slack webhook service for loss ratio analysis.
//!
//! Receives file uploads through the Events API and the `/lossratio` and
//! `/explain` slash commands, keeps per-channel session state, and posts
//! results back with the Web API.

pub mod api;
pub mod config;
pub mod errors;
pub mod metrics_defs;
pub mod reports;
pub mod session;
pub mod slack;
pub mod state;
pub mod tasks;

#[cfg(test)]
mod testutils;

use crate::config::Config;
use crate::errors::WebhookError;
use crate::session::SessionStore;
use crate::slack::SlackClient;
use crate::state::{AppState, CredentialStatus};
use crate::tasks::BackgroundTasks;
use actuarial::{Calculator, HttpFetcher};
use commentary::Commentary;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the application state and serves until a shutdown signal arrives.
pub async fn run(config: Config, commentary_config: commentary::Config) -> Result<(), WebhookError> {
    config.validate()?;

    let client = reqwest::Client::builder().build()?;
    let fetcher = HttpFetcher::new(client.clone(), config.slack.bot_token.clone());
    let calculator = Calculator::new(Arc::new(fetcher), config.default_source.clone());
    let chat = SlackClient::new(client, &config.slack);

    let commentary = Commentary::from_config(&commentary_config, config.loss_ratio_threshold)?;
    if commentary.is_none() {
        tracing::warn!("Completion API key not configured, AI features are disabled");
    }
    if !config.slack.bot_token.is_configured() {
        tracing::warn!("Slack bot token not configured, uploads and replies will fail");
    }

    let tasks = BackgroundTasks::new(config.background_task_timeout());
    let state = AppState {
        calculator,
        commentary: commentary.map(Arc::new),
        chat: Arc::new(chat),
        sessions: SessionStore::new(),
        tasks: tasks.clone(),
        threshold: config.loss_ratio_threshold,
        credentials: CredentialStatus::new(&config.slack.bot_token, &commentary_config.api_key),
    };

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Starting server");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(
        in_flight = tasks.in_flight(),
        grace_secs = config.shutdown_grace_secs,
        "Server stopped, draining background tasks"
    );
    tasks.shutdown(config.shutdown_grace()).await;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Cannot listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
