use crate::config::SlackConfig;
use crate::metrics_defs::MESSAGES_DELIVERED;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::counter;
use shared::credential::Credential;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("Slack request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Slack API error: {0}")]
    Api(String),
}

/// Posts messages to chat channels.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError>;
}

#[derive(Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
}

/// Slack Web API client authenticated with the bot token.
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    base_url: String,
    token: Credential,
}

impl SlackClient {
    pub fn new(client: reqwest::Client, config: &SlackConfig) -> Self {
        SlackClient {
            client,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        }
    }
}

#[async_trait]
impl ChatApi for SlackClient {
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let url = format!("{}/chat.postMessage", self.base_url);

        // Slack answers 200 even for failures and reports them in the body.
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose())
            .json(&PostMessage { channel, text })
            .send()
            .await?
            .error_for_status()?
            .json::<ApiResponse>()
            .await?;

        if response.ok {
            Ok(())
        } else {
            Err(SlackError::Api(
                response.error.unwrap_or_else(|| "unknown_error".into()),
            ))
        }
    }
}

/// Posts `text` to `channel`. Failures are only logged.
pub async fn deliver(chat: &dyn ChatApi, channel: &str, text: &str) {
    match chat.post_message(channel, text).await {
        Ok(()) => {
            counter!(MESSAGES_DELIVERED, "status" => "ok").increment(1);
            tracing::info!(channel, "Sent message to channel");
        }
        Err(err) => {
            counter!(MESSAGES_DELIVERED, "status" => "error").increment(1);
            tracing::error!(channel, error = %err, "Error sending message");
        }
    }
}
