use actuarial::format::DEFAULT_THRESHOLD;
use serde::Deserialize;
use shared::credential::Credential;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_SOURCE: &str = "actuarial_sophisticated_sample.xlsx";

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Loss ratio threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),

    #[error("Background task timeout cannot be 0")]
    ZeroTaskTimeout,
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlackConfig {
    /// Bot token, used for file downloads and `chat.postMessage`.
    pub bot_token: Credential,
    pub api_base_url: Url,
}

impl Default for SlackConfig {
    fn default() -> Self {
        SlackConfig {
            bot_token: Credential::default(),
            api_base_url: Url::parse(DEFAULT_SLACK_API_URL).expect("default Slack URL is valid"),
        }
    }
}

/// Webhook service configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub listener: Listener,
    pub slack: SlackConfig,
    /// Workbook analysed by `/lossratio` when the channel has no upload yet.
    pub default_source: PathBuf,
    pub loss_ratio_threshold: f64,
    pub background_task_timeout_secs: u64,
    /// How long pending background tasks may run after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listener: Listener::default(),
            slack: SlackConfig::default(),
            default_source: PathBuf::from(DEFAULT_SOURCE),
            loss_ratio_threshold: DEFAULT_THRESHOLD,
            background_task_timeout_secs: 120,
            shutdown_grace_secs: 10,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;

        if !self.loss_ratio_threshold.is_finite() || self.loss_ratio_threshold < 0.0 {
            return Err(ValidationError::InvalidThreshold(self.loss_ratio_threshold));
        }
        if self.background_task_timeout_secs == 0 {
            return Err(ValidationError::ZeroTaskTimeout);
        }

        Ok(())
    }

    pub fn background_task_timeout(&self) -> Duration {
        Duration::from_secs(self.background_task_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let yaml = r#"
listener:
    host: "127.0.0.1"
    port: 8080
slack:
    bot_token: xoxb-123
default_source: /srv/data/portfolio.xlsx
loss_ratio_threshold: 65.5
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());

        assert_eq!(config.listener.port, 8080);
        assert!(config.slack.bot_token.is_configured());
        assert_eq!(config.slack.api_base_url.as_str(), "https://slack.com/api");
        assert_eq!(config.default_source, PathBuf::from("/srv/data/portfolio.xlsx"));
        assert_eq!(config.loss_ratio_threshold, 65.5);
        assert_eq!(config.background_task_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.listener.port, 3000);
        assert_eq!(config.loss_ratio_threshold, 75.0);
        assert_eq!(config.default_source, PathBuf::from(DEFAULT_SOURCE));
        assert!(!config.slack.bot_token.is_configured());
    }

    #[test]
    fn test_validation_errors() {
        let base_config = Config::default();

        let mut config = base_config.clone();
        config.listener.port = 0;
        assert_eq!(config.validate().unwrap_err(), ValidationError::InvalidPort);

        let mut config = base_config.clone();
        config.loss_ratio_threshold = -1.0;
        assert_eq!(
            config.validate().unwrap_err(),
            ValidationError::InvalidThreshold(-1.0)
        );

        let mut config = base_config.clone();
        config.loss_ratio_threshold = f64::NAN;
        assert!(matches!(
            config.validate().unwrap_err(),
            ValidationError::InvalidThreshold(_)
        ));

        let mut config = base_config;
        config.background_task_timeout_secs = 0;
        assert_eq!(config.validate().unwrap_err(), ValidationError::ZeroTaskTimeout);
    }

    #[test]
    fn test_deserialization_errors() {
        // Invalid port type
        assert!(serde_yaml::from_str::<Config>("listener: {host: a, port: nope}").is_err());

        // Listener needs both fields
        assert!(serde_yaml::from_str::<Config>("listener: {host: a}").is_err());

        // Invalid URL
        assert!(serde_yaml::from_str::<Config>("slack: {api_base_url: not-a-url}").is_err());
    }
}
