//! Discord-compatible webhook notification channel.
//!
//! Implements Discord's recommended rate limit handling:
//! - No hardcoded rate limits
//! - Parses response headers (X-RateLimit-*)
//! - Retries on 429 responses respecting Retry-After header

use std::time::Duration;

use async_trait::async_trait;
use platforms_probe::Platform;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::{LiveEvent, NotificationChannel};
use crate::Result;

/// Maximum number of retries for rate-limited requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Webhook channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Whether the channel is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Discord-compatible webhook URL.
    #[serde(default)]
    pub webhook_url: String,
    /// Optional username for the webhook.
    #[serde(default = "default_username")]
    pub username: Option<String>,
    /// Optional avatar URL for the webhook.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

fn default_username() -> Option<String> {
    Some("vigil".to_string())
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            webhook_url: String::new(),
            username: default_username(),
            avatar_url: None,
        }
    }
}

/// Webhook notification channel.
pub struct WebhookChannel {
    config: WebhookConfig,
    client: Client,
}

impl WebhookChannel {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Embed color matching the platform's brand.
    fn get_color(platform: Platform) -> u32 {
        match platform {
            Platform::YouTube => 0xff0000,
            Platform::Twitch => 0x9146ff,
            Platform::TikTok => 0x69c9d0,
            Platform::Kick => 0x53fc18,
        }
    }

    /// Build the webhook payload for a live event.
    fn build_payload(&self, event: &LiveEvent) -> serde_json::Value {
        let embed = json!({
            "title": format!("{} is live on {}!", event.display_name, event.platform.label()),
            "description": format!("Watch the stream: {}", event.live_url),
            "url": event.live_url,
            "color": Self::get_color(event.platform),
            "timestamp": event.timestamp.to_rfc3339(),
            "fields": [
                {
                    "name": "Platform",
                    "value": event.platform.label(),
                    "inline": true
                }
            ]
        });

        let mut payload = json!({
            "embeds": [embed]
        });

        if let Some(username) = &self.config.username {
            payload["username"] = json!(username);
        }
        if let Some(avatar_url) = &self.config.avatar_url {
            payload["avatar_url"] = json!(avatar_url);
        }

        payload
    }

    /// Send request with rate limit handling.
    /// Retries on 429 responses respecting the Retry-After header.
    async fn send_with_retry(&self, payload: &serde_json::Value) -> Result<()> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let response = self
                .client
                .post(&self.config.webhook_url)
                .json(payload)
                .send()
                .await
                .map_err(|e| crate::Error::Other(format!("webhook request failed: {e}")))?;

            let status = response.status();

            if status.is_success() {
                return Ok(());
            }

            if status.as_u16() == 429 {
                let retry_after = self.parse_retry_after(&response).await;

                if attempts >= MAX_RATE_LIMIT_RETRIES {
                    warn!(
                        "webhook rate limit: max retries ({}) exceeded, last retry_after was {:?}",
                        MAX_RATE_LIMIT_RETRIES, retry_after
                    );
                    return Err(crate::Error::Other(format!(
                        "webhook rate limit exceeded after {MAX_RATE_LIMIT_RETRIES} retries"
                    )));
                }

                let wait_duration = retry_after.unwrap_or(Duration::from_secs(1));
                debug!(
                    "webhook rate limited (429), waiting {:?} before retry (attempt {}/{})",
                    wait_duration, attempts, MAX_RATE_LIMIT_RETRIES
                );
                tokio::time::sleep(wait_duration).await;
                continue;
            }

            // Other error - don't retry
            let body = response.text().await.unwrap_or_default();
            warn!("webhook failed: {} - {}", status, body);
            return Err(crate::Error::Other(format!(
                "webhook failed: {status} - {body}"
            )));
        }
    }

    /// Parse the Retry-After duration from a 429 response.
    async fn parse_retry_after(&self, response: &reqwest::Response) -> Option<Duration> {
        // Try Retry-After header first (Discord sets this)
        if let Some(retry_after) = response.headers().get("Retry-After")
            && let Ok(secs) = retry_after.to_str().ok()?.parse::<f64>()
        {
            return Some(Duration::from_secs_f64(secs));
        }

        // Fallback: try X-RateLimit-Reset-After header
        if let Some(reset_after) = response.headers().get("X-RateLimit-Reset-After")
            && let Ok(secs) = reset_after.to_str().ok()?.parse::<f64>()
        {
            return Some(Duration::from_secs_f64(secs));
        }

        None
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    fn channel_type(&self) -> &'static str {
        "webhook"
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled && !self.config.webhook_url.is_empty()
    }

    async fn send(&self, event: &LiveEvent) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let payload = self.build_payload(event);
        self.send_with_retry(&payload).await?;

        debug!(
            account = %event.display_name,
            platform = %event.platform,
            "live notification sent"
        );
        Ok(())
    }

    async fn test(&self) -> Result<()> {
        let event = LiveEvent::new("vigil test", Platform::Twitch, "https://twitch.tv/");
        self.send(&event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = WebhookConfig::default();
        assert!(!config.enabled);
        assert!(config.webhook_url.is_empty());
        assert_eq!(config.username.as_deref(), Some("vigil"));
    }

    #[test]
    fn test_channel_disabled_without_url() {
        let channel = WebhookChannel::new(WebhookConfig::default());
        assert!(!channel.is_enabled());

        let channel = WebhookChannel::new(WebhookConfig {
            enabled: true,
            ..Default::default()
        });
        assert!(!channel.is_enabled());
    }

    #[test]
    fn test_get_color_per_platform() {
        assert_eq!(WebhookChannel::get_color(Platform::YouTube), 0xff0000);
        assert_eq!(WebhookChannel::get_color(Platform::Kick), 0x53fc18);
    }

    #[test]
    fn test_build_payload() {
        let channel = WebhookChannel::new(WebhookConfig::default());
        let event = LiveEvent::new("ninja", Platform::Twitch, "https://twitch.tv/ninja");

        let payload = channel.build_payload(&event);

        assert!(payload["embeds"].is_array());
        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "ninja is live on Twitch!");
        assert_eq!(embed["url"], "https://twitch.tv/ninja");
        assert_eq!(
            embed["color"],
            WebhookChannel::get_color(Platform::Twitch) as i64
        );
        assert_eq!(embed["fields"][0]["name"], "Platform");
        assert_eq!(embed["fields"][0]["value"], "Twitch");
        assert_eq!(
            embed["timestamp"].as_str().unwrap(),
            event.timestamp.to_rfc3339()
        );
    }

    #[test]
    fn test_build_payload_with_custom_username() {
        let channel = WebhookChannel::new(WebhookConfig {
            enabled: true,
            webhook_url: "https://example.com".to_string(),
            username: Some("CustomBot".to_string()),
            avatar_url: Some("https://example.com/avatar.png".to_string()),
        });

        let event = LiveEvent::new("ninja", Platform::Twitch, "https://twitch.tv/ninja");
        let payload = channel.build_payload(&event);

        assert_eq!(payload["username"], "CustomBot");
        assert_eq!(payload["avatar_url"], "https://example.com/avatar.png");
    }

    #[tokio::test]
    async fn test_disabled_channel_send_is_a_noop() {
        let channel = WebhookChannel::new(WebhookConfig::default());
        let event = LiveEvent::new("ninja", Platform::Twitch, "https://twitch.tv/ninja");
        channel.send(&event).await.unwrap();
    }
}
