use serde::Deserialize;
use std::fmt;

/// A bearer token or API key read from configuration.
///
/// The value never shows up in `Debug` output, so configs can be logged.
/// Deployment templates ship values such as `YOUR_SLACK_BOT_TOKEN_HERE`;
/// those count as unset.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Credential(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_configured(&self) -> bool {
        let value = self.0.trim();
        !value.is_empty() && !is_placeholder(value)
    }

    /// Human readable status used on the health endpoint and at startup.
    pub fn status(&self) -> &'static str {
        if self.is_configured() {
            "✅ Set"
        } else {
            "❌ NOT SET"
        }
    }
}

fn is_placeholder(value: &str) -> bool {
    value.starts_with("YOUR_") && value.ends_with("_HERE")
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            f.write_str("Credential(<redacted>)")
        } else {
            f.write_str("Credential(<unset>)")
        }
    }
}
