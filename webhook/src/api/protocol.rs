//! Slack payload shapes. Only the fields the bot acts on are modelled.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header Slack sets when it redelivers an event it considers unacknowledged.
pub const RETRY_HEADER: &str = "x-slack-retry-num";

/// Outer body of every Events API request.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventEnvelope {
    /// Set only on the `url_verification` handshake.
    pub challenge: Option<Value>,
    pub team_id: Option<String>,
    pub event: Option<Value>,
}

impl EventEnvelope {
    /// Decodes the inner event. Shapes the bot does not understand yield `None`.
    pub fn event(&self) -> Option<Event> {
        let value = self.event.as_ref()?;
        match serde_json::from_value(value.clone()) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring undecodable event");
                None
            }
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub channel: Option<String>,
    pub team: Option<String>,
    pub bot_id: Option<String>,
    pub files: Vec<SharedFile>,
}

impl Event {
    /// A user-posted message with at least one attachment.
    ///
    /// Edits and bot echoes also carry files; they are skipped.
    pub fn is_file_share(&self) -> bool {
        self.kind.as_deref() == Some("message")
            && self.bot_id.is_none()
            && matches!(self.subtype.as_deref(), None | Some("file_share"))
            && !self.files.is_empty()
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SharedFile {
    pub name: Option<String>,
    pub url_private: Option<String>,
}

/// Form body of a slash command invocation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SlashCommand {
    pub text: String,
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Visible to everyone in the channel.
    InChannel,
    /// Visible only to the invoking user.
    Ephemeral,
}

/// Synchronous reply to a slash command.
#[derive(Debug, Serialize)]
pub struct CommandReply {
    pub response_type: ResponseType,
    pub text: String,
}

impl CommandReply {
    pub fn in_channel(text: impl Into<String>) -> Self {
        CommandReply {
            response_type: ResponseType::InChannel,
            text: text.into(),
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        CommandReply {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
        }
    }
}
