use serde::Deserialize;
use shared::credential::Credential;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    #[error("{0} must be greater than 0")]
    ZeroTokenLimit(&'static str),
}

/// Completion API settings
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Credential,
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    pub base_url: Url,
    pub model: String,
    pub temperature: f32,
    pub summary_max_tokens: u32,
    pub answer_max_tokens: u32,
    /// Request timeout. Unset keeps the HTTP client's default.
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: Credential::default(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            model: DEFAULT_MODEL.into(),
            temperature: 0.7,
            summary_max_tokens: 200,
            answer_max_tokens: 300,
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_configured()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature(self.temperature));
        }
        if self.summary_max_tokens == 0 {
            return Err(ValidationError::ZeroTokenLimit("summary_max_tokens"));
        }
        if self.answer_max_tokens == 0 {
            return Err(ValidationError::ZeroTokenLimit("answer_max_tokens"));
        }
        Ok(())
    }
}
