use crate::config::Config;
use crate::errors::CommentaryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::credential::Credential;
use std::time::Duration;
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of a `/chat/completions` request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// A chat-style text completion backend.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Returns the generated text, trimmed.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CommentaryError>;
}

/// Client for OpenAI-compatible chat completion APIs (DeepSeek by default).
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Credential,
}

impl ChatCompletionsClient {
    pub fn new(config: &Config) -> Result<Self, CommentaryError> {
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            config.base_url.as_str().trim_end_matches('/')
        ))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(ChatCompletionsClient {
            client: builder.build()?,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CompletionApi for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CommentaryError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommentaryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion = response.json::<CompletionResponse>().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(CommentaryError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ChatCompletionsClient {
        let config = Config {
            api_key: Credential::new("sk-test"),
            base_url: Url::parse(&server.uri()).unwrap(),
            ..Config::default()
        };
        ChatCompletionsClient::new(&config).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "deepseek-chat".into(),
            messages: vec![
                ChatMessage::system("You are an actuary."),
                ChatMessage::user("How is the portfolio?"),
            ],
            temperature: 0.7,
            max_tokens: 200,
        }
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "deepseek-chat",
                "max_tokens": 200,
                "messages": [
                    {"role": "system", "content": "You are an actuary."},
                    {"role": "user", "content": "How is the portfolio?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "  Looks healthy.\n"}}
                ]
            })))
            .mount(&mock_server)
            .await;

        let text = client_for(&mock_server).complete(&request()).await.unwrap();
        assert_eq!(text, "Looks healthy.");
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .complete(&request())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "completion API returned 401: invalid api key"
        );
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, CommentaryError::EmptyResponse));
    }
}
