//! HTTP surface: Slack Events API callback, slash commands and status pages.

pub mod commands;
pub mod events;
pub mod protocol;
pub mod status;

use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/slack/events", post(events::handle_event))
        .route("/lossratio", post(commands::loss_ratio))
        .route("/explain", post(commands::explain))
        .route("/health", get(status::health))
        .route("/", get(status::home))
        .with_state(state)
}
