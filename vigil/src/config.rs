//! Application configuration.
//!
//! Loaded from an optional TOML file; every section has defaults so a
//! missing file or a partial file is fine. Secrets can come from the
//! environment (or a `.env` file) instead, overriding the file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use platforms_probe::CheckerSettings;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notification::WebhookConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scheduler: SchedulerSection,
    #[serde(default)]
    pub youtube: YoutubeSection,
    #[serde(default)]
    pub twitch: TwitchSection,
    #[serde(default)]
    pub kick: KickSection,
    #[serde(default)]
    pub notification: WebhookConfig,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerSection {
    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    300
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YoutubeSection {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitchSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KickSection {
    /// Minimum milliseconds between consecutive Kick requests.
    #[serde(default = "default_kick_spacing_ms")]
    pub request_spacing_ms: u64,
}

fn default_kick_spacing_ms() -> u64 {
    3000
}

impl Default for KickSection {
    fn default() -> Self {
        Self {
            request_spacing_ms: default_kick_spacing_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// Path of the tracked-accounts JSON file.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("accounts.json")
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then layer environment
    /// overrides on top. A missing file is not an error: defaults apply.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)
                    .map_err(|e| Error::config(format!("failed to parse {}: {e}", path.display())))?
            }
            _ => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply environment-style overrides so secrets can stay out of the
    /// config file. Factored over a lookup function for testability.
    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(key) = get("YOUTUBE_API_KEY") {
            self.youtube.api_key = Some(key);
        }
        if let Some(id) = get("TWITCH_CLIENT_ID") {
            self.twitch.client_id = Some(id);
        }
        if let Some(secret) = get("TWITCH_CLIENT_SECRET") {
            self.twitch.client_secret = Some(secret);
        }
        if let Some(url) = get("VIGIL_WEBHOOK_URL") {
            self.notification.webhook_url = url;
            self.notification.enabled = true;
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.poll_interval_secs)
    }

    /// Settings consumed by the checker registry.
    pub fn checker_settings(&self) -> CheckerSettings {
        CheckerSettings {
            youtube_api_key: self.youtube.api_key.clone(),
            twitch_client_id: self.twitch.client_id.clone(),
            twitch_client_secret: self.twitch.client_secret.clone(),
            kick_request_spacing: Duration::from_millis(self.kick.request_spacing_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.scheduler.poll_interval_secs, 300);
        assert_eq!(config.kick.request_spacing_ms, 3000);
        assert_eq!(config.store.path, PathBuf::from("accounts.json"));
        assert!(config.youtube.api_key.is_none());
        assert!(!config.notification.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [scheduler]
            poll_interval_secs = 60

            [twitch]
            client_id = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler.poll_interval_secs, 60);
        assert_eq!(config.twitch.client_id.as_deref(), Some("abc"));
        assert!(config.twitch.client_secret.is_none());
        // untouched sections keep their defaults
        assert_eq!(config.kick.request_spacing_ms, 3000);
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [youtube]
            api_key = "from-file"
            "#,
        )
        .unwrap();

        config.apply_overrides(|name| match name {
            "YOUTUBE_API_KEY" => Some("from-env".to_string()),
            "VIGIL_WEBHOOK_URL" => Some("https://example.com/hook".to_string()),
            _ => None,
        });

        assert_eq!(config.youtube.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.notification.webhook_url, "https://example.com/hook");
        assert!(config.notification.enabled);
        assert!(config.twitch.client_id.is_none());
    }

    #[test]
    fn test_checker_settings_mapping() {
        let mut config = AppConfig::default();
        config.kick.request_spacing_ms = 1500;
        config.twitch.client_id = Some("id".to_string());

        let settings = config.checker_settings();
        assert_eq!(settings.kick_request_spacing, Duration::from_millis(1500));
        assert_eq!(settings.twitch_client_id.as_deref(), Some("id"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/vigil.toml"))).unwrap();
        assert_eq!(config.scheduler.poll_interval_secs, 300);
    }
}
