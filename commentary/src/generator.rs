use crate::client::{ChatCompletionsClient, ChatMessage, CompletionApi, CompletionRequest};
use crate::config::Config;
use crate::errors::CommentaryError;
use crate::metrics_defs::{COMPLETION_DURATION, COMPLETION_FAILURES};
use crate::prompts;
use actuarial::{LossRatio, RatioResult};
use shared::{counter, histogram};
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::Instant;

pub const NO_DATA_ANSWER: &str = "I don't have any analysis data to reference. \
     Please upload an Excel file or run /lossratio first.";

/// The apology shown in the channel when an answer could not be generated.
pub fn failed_answer(err: &impl Display) -> String {
    format!("Sorry, I couldn't generate an answer. Error: {err}")
}

/// Generates insights and answers about a loss ratio with a completion API.
pub struct Commentary {
    api: Arc<dyn CompletionApi>,
    model: String,
    temperature: f32,
    summary_max_tokens: u32,
    answer_max_tokens: u32,
    threshold: f64,
}

impl Commentary {
    pub fn new(api: Arc<dyn CompletionApi>, config: &Config, threshold: f64) -> Self {
        Commentary {
            api,
            model: config.model.clone(),
            temperature: config.temperature,
            summary_max_tokens: config.summary_max_tokens,
            answer_max_tokens: config.answer_max_tokens,
            threshold,
        }
    }

    /// Builds commentary backed by [`ChatCompletionsClient`], or `None` when no API key is set.
    pub fn from_config(config: &Config, threshold: f64) -> Result<Option<Self>, CommentaryError> {
        if !config.is_enabled() {
            return Ok(None);
        }
        let client = ChatCompletionsClient::new(config)?;
        Ok(Some(Commentary::new(Arc::new(client), config, threshold)))
    }

    /// A 2-3 sentence business insight. Failures are logged and yield `None`.
    pub async fn summarize(&self, ratio: &LossRatio) -> Option<String> {
        let prompt = prompts::summary_prompt(ratio, self.threshold);
        match self
            .complete(
                "summary",
                prompts::SUMMARY_SYSTEM_PROMPT,
                prompt,
                self.summary_max_tokens,
            )
            .await
        {
            Ok(insight) => Some(insight),
            Err(err) => {
                tracing::warn!(error = %err, "AI insight generation failed");
                None
            }
        }
    }

    /// Answers a free-text question about the last result. Never fails: errors
    /// become an apology the user can read.
    pub async fn answer(&self, question: &str, result: Option<&RatioResult>) -> String {
        let Some(Ok(ratio)) = result else {
            return NO_DATA_ANSWER.to_string();
        };

        let prompt = prompts::answer_prompt(question, ratio, self.threshold);
        match self
            .complete(
                "answer",
                prompts::ANSWER_SYSTEM_PROMPT,
                prompt,
                self.answer_max_tokens,
            )
            .await
        {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!(error = %err, "AI answer generation failed");
                failed_answer(&err)
            }
        }
    }

    async fn complete(
        &self,
        purpose: &'static str,
        system_prompt: &str,
        prompt: String,
        max_tokens: u32,
    ) -> Result<String, CommentaryError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)],
            temperature: self.temperature,
            max_tokens,
        };

        let started = Instant::now();
        let result = self.api.complete(&request).await;
        histogram!(COMPLETION_DURATION, "purpose" => purpose).record(started.elapsed().as_secs_f64());
        if result.is_err() {
            counter!(COMPLETION_FAILURES, "purpose" => purpose).increment(1);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Role;
    use actuarial::AnalysisError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        reply: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl CompletionApi for RecordingApi {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CommentaryError> {
            self.requests.lock().unwrap().push(request.clone());
            self.reply.clone().ok_or(CommentaryError::EmptyResponse)
        }
    }

    fn commentary(api: Arc<RecordingApi>) -> Commentary {
        Commentary::new(api, &Config::default(), 75.0)
    }

    #[tokio::test]
    async fn test_summarize_request_shape() {
        let api = Arc::new(RecordingApi {
            reply: Some("Portfolio is under pressure.".into()),
            ..Default::default()
        });
        let insight = commentary(api.clone())
            .summarize(&LossRatio::new(3000.0, 2400.0, 2))
            .await;
        assert_eq!(insight.as_deref(), Some("Portfolio is under pressure."));

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "deepseek-chat");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 200);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, prompts::SUMMARY_SYSTEM_PROMPT);
        assert!(request.messages[1].content.contains("Loss Ratio: 80.0%"));
    }

    #[tokio::test]
    async fn test_summarize_failure_is_none() {
        let api = Arc::new(RecordingApi::default());
        let insight = commentary(api)
            .summarize(&LossRatio::new(1000.0, 100.0, 1))
            .await;
        assert_eq!(insight, None);
    }

    #[tokio::test]
    async fn test_answer() {
        let api = Arc::new(RecordingApi {
            reply: Some("Claims are 80% of premium.".into()),
            ..Default::default()
        });
        let result: RatioResult = Ok(LossRatio::new(3000.0, 2400.0, 2));
        let answer = commentary(api.clone())
            .answer("why so high?", Some(&result))
            .await;
        assert_eq!(answer, "Claims are 80% of premium.");

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests[0].max_tokens, 300);
        assert!(requests[0].messages[1].content.contains("User Question: why so high?"));
    }

    #[tokio::test]
    async fn test_answer_failure_is_apology() {
        let api = Arc::new(RecordingApi::default());
        let result: RatioResult = Ok(LossRatio::new(3000.0, 2400.0, 2));
        let answer = commentary(api).answer("why?", Some(&result)).await;
        assert_eq!(
            answer,
            "Sorry, I couldn't generate an answer. Error: completion API returned no content"
        );
    }

    #[tokio::test]
    async fn test_answer_without_data_skips_api() {
        let api = Arc::new(RecordingApi {
            reply: Some("unused".into()),
            ..Default::default()
        });
        let failed: RatioResult = Err(AnalysisError::NotFound);

        let commentary = commentary(api.clone());
        assert_eq!(commentary.answer("why?", None).await, NO_DATA_ANSWER);
        assert_eq!(commentary.answer("why?", Some(&failed)).await, NO_DATA_ANSWER);
        assert!(api.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(Commentary::from_config(&Config::default(), 75.0).unwrap().is_none());

        let config = Config {
            api_key: shared::credential::Credential::new("sk-live"),
            ..Config::default()
        };
        assert!(Commentary::from_config(&config, 75.0).unwrap().is_some());
    }
}
