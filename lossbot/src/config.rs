use serde::Deserialize;
use shared::credential::Credential;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct CommonConfig {
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub common: CommonConfig,
    pub webhook: webhook::config::Config,
    pub commentary: commentary::Config,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let data = serde_yaml::from_str(&contents)?;

        Ok(data)
    }

    /// Loads the file if given, applies environment overrides and validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Overrides settings from environment variables, looked up through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(token) = lookup("SLACK_BOT_TOKEN") {
            self.webhook.slack.bot_token = Credential::new(token);
        }
        if let Some(key) = lookup("DEEPSEEK_API_KEY") {
            self.commentary.api_key = Credential::new(key);
        }
        if let Some(port) = lookup("PORT") {
            self.webhook.listener.port = parse_env("PORT", &port)?;
        }
        if let Some(path) = lookup("DEFAULT_SPREADSHEET") {
            self.webhook.default_source = PathBuf::from(path);
        }
        if let Some(threshold) = lookup("LOSS_RATIO_THRESHOLD") {
            self.webhook.loss_ratio_threshold = parse_env("LOSS_RATIO_THRESHOLD", &threshold)?;
        }
        if let Some(dsn) = lookup("SENTRY_DSN") {
            self.common.logging = Some(LoggingConfig { sentry_dsn: dsn });
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.webhook.validate()?;
        self.commentary.validate()?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
    #[error("invalid webhook config: {0}")]
    Webhook(#[from] webhook::config::ValidationError),
    #[error("invalid commentary config: {0}")]
    Commentary(#[from] commentary::config::ValidationError),
}
