use serde::{Deserialize, Serialize};
use wasend_core::MessagingConfig;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawWasendConfig {
    #[serde(default)]
    pub messaging: RawMessagingConfig,

    #[serde(default)]
    pub cli: RawCliConfig,
}

/// Messaging config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawMessagingConfig {
    /// Typing indicator duration in milliseconds
    pub typing_duration_ms: Option<u64>,

    /// Country code for local numbers
    pub default_country_code: Option<String>,
}

/// CLI config as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawCliConfig {
    /// Session id used when `--session` is not given
    pub default_session: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WasendConfig {
    #[serde(default)]
    pub messaging: MessagingConfig,

    #[serde(default)]
    pub cli: CliConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Session id used when `--session` is not given
    pub default_session: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_session: DEFAULT_SESSION.to_string(),
        }
    }
}

/// Session id of the dry-run session when nothing else is configured
pub const DEFAULT_SESSION: &str = "default";
