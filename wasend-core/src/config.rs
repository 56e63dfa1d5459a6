//! Configuration for outbound messaging

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default wait between `composing` and `available` presence updates
pub const DEFAULT_TYPING_DURATION_MS: u64 = 1000;

/// Messaging configuration, usually read from the `[messaging]` TOML table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// How long the typing indicator stays on, in milliseconds
    #[serde(default = "default_typing_duration_ms")]
    pub typing_duration_ms: u64,

    /// Country calling code used to rewrite local numbers with a leading 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_country_code: Option<String>,
}

fn default_typing_duration_ms() -> u64 {
    DEFAULT_TYPING_DURATION_MS
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            typing_duration_ms: DEFAULT_TYPING_DURATION_MS,
            default_country_code: None,
        }
    }
}

impl MessagingConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Set the typing indicator duration
    pub fn with_typing_duration(mut self, duration: Duration) -> Self {
        self.typing_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the country code for local numbers
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.default_country_code = Some(code.into());
        self
    }

    /// Typing indicator duration
    pub fn typing_duration(&self) -> Duration {
        Duration::from_millis(self.typing_duration_ms)
    }
}
