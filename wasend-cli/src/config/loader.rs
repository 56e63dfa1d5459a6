use super::types::{
    CliConfig, DEFAULT_SESSION, RawCliConfig, RawMessagingConfig, RawWasendConfig, WasendConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;
use wasend_core::MessagingConfig;
use wasend_core::config::DEFAULT_TYPING_DURATION_MS;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project + explicit file)
    pub fn load(explicit: Option<&Path>) -> Result<WasendConfig> {
        let mut raw = RawWasendConfig::default();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read(&project_path)?);
        }

        // Layer 3: --config file, which must exist
        if let Some(path) = explicit {
            raw = Self::merge_raw(raw, Self::read(path)?);
        }

        Ok(Self::finalize(raw))
    }

    fn read(path: &Path) -> Result<RawWasendConfig> {
        debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wasend").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with WASEND_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("WASEND_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".wasend/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawWasendConfig, overlay: RawWasendConfig) -> RawWasendConfig {
        RawWasendConfig {
            messaging: RawMessagingConfig {
                typing_duration_ms: overlay
                    .messaging
                    .typing_duration_ms
                    .or(base.messaging.typing_duration_ms),
                default_country_code: overlay
                    .messaging
                    .default_country_code
                    .or(base.messaging.default_country_code),
            },
            cli: RawCliConfig {
                default_session: overlay.cli.default_session.or(base.cli.default_session),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawWasendConfig) -> WasendConfig {
        WasendConfig {
            messaging: MessagingConfig {
                typing_duration_ms: raw
                    .messaging
                    .typing_duration_ms
                    .unwrap_or(DEFAULT_TYPING_DURATION_MS),
                default_country_code: raw.messaging.default_country_code,
            },
            cli: CliConfig {
                default_session: raw
                    .cli
                    .default_session
                    .unwrap_or_else(|| DEFAULT_SESSION.to_string()),
            },
        }
    }
}
