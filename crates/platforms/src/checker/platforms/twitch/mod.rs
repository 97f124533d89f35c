//! Twitch live checker backed by the Helix API.

mod token;

pub use token::TokenCache;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::checker::error::CheckerError;
use crate::checker::platform::Platform;
use crate::checker::platform_checker::{Checker, LiveCheck, PlatformChecker};

const STREAMS_URL: &str = "https://api.twitch.tv/helix/streams";

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    data: Vec<StreamEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    #[serde(rename = "type")]
    #[serde(default)]
    stream_type: String,
}

impl StreamsResponse {
    /// Helix only returns active streams here, but the `type` field can be
    /// empty during error states; count only entries explicitly live.
    fn has_live_stream(&self) -> bool {
        self.data.iter().any(|s| s.stream_type == "live")
    }
}

pub struct TwitchChecker {
    checker: Checker,
    client_id: Option<String>,
    client_secret: Option<String>,
    token: TokenCache,
}

impl TwitchChecker {
    pub fn new(client: Client, client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            checker: Checker::new(client),
            client_id,
            client_secret,
            token: TokenCache::new(),
        }
    }

    async fn lookup_stream(
        &self,
        username: &str,
        client_id: &str,
        bearer: &str,
    ) -> Result<StreamsResponse, CheckerError> {
        let response = self
            .checker
            .get(STREAMS_URL)
            .query(&[("user_login", username), ("first", "1")])
            .header("Client-Id", client_id)
            .bearer_auth(bearer)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CheckerError::AccessDenied(
                "Helix rejected the app access token".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(CheckerError::BadStatus(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PlatformChecker for TwitchChecker {
    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    /// Never errors: missing credentials, grant failures and Helix rejections
    /// all degrade to not-live for the cycle.
    async fn check_live(
        &self,
        username: &str,
        _resolved_id: Option<&str>,
    ) -> Result<LiveCheck, CheckerError> {
        let (Some(client_id), Some(client_secret)) =
            (self.client_id.as_deref(), self.client_secret.as_deref())
        else {
            warn!(username, "Twitch credentials not configured, reporting not-live");
            return Ok(LiveCheck::offline());
        };

        let bearer = match self
            .token
            .ensure(&self.checker.client, client_id, client_secret)
            .await
        {
            Ok(token) => token,
            Err(e) => {
                // Cache stays empty; the next cycle retries the grant.
                warn!(username, error = %e, "Twitch token acquisition failed");
                return Ok(LiveCheck::offline());
            }
        };

        match self.lookup_stream(username, client_id, &bearer).await {
            Ok(body) => {
                debug!(username, streams = body.data.len(), "Helix streams lookup");
                Ok(LiveCheck::new(body.has_live_stream()))
            }
            Err(CheckerError::AccessDenied(reason)) => {
                warn!(username, %reason, "Twitch token rejected, re-acquiring next cycle");
                self.token.invalidate().await;
                Ok(LiveCheck::offline())
            }
            Err(e) => {
                warn!(username, error = %e, "Twitch live check failed");
                Ok(LiveCheck::offline())
            }
        }
    }

    fn live_url(&self, username: &str, _resolved_id: Option<&str>) -> String {
        format!("https://twitch.tv/{username}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::default::default_client;

    #[test]
    fn test_streams_response_detects_live() {
        let json = r#"{"data":[{"id":"1","user_login":"ninja","type":"live"}]}"#;
        let parsed: StreamsResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.has_live_stream());
    }

    #[test]
    fn test_streams_response_empty_means_offline() {
        let parsed: StreamsResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(!parsed.has_live_stream());
        let parsed: StreamsResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.has_live_stream());
    }

    #[test]
    fn test_streams_response_ignores_non_live_entries() {
        let json = r#"{"data":[{"id":"1","type":""}]}"#;
        let parsed: StreamsResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.has_live_stream());
    }

    #[test]
    fn test_live_url() {
        let checker = TwitchChecker::new(default_client(), None, None);
        assert_eq!(checker.live_url("ninja", None), "https://twitch.tv/ninja");
    }

    #[tokio::test]
    async fn test_missing_credentials_degrade_to_offline() {
        let checker = TwitchChecker::new(default_client(), None, None);
        let check = checker.check_live("ninja", None).await.unwrap();
        assert!(!check.live);

        // Only one half configured counts as missing too.
        let checker =
            TwitchChecker::new(default_client(), Some("id".to_string()), None);
        let check = checker.check_live("ninja", None).await.unwrap();
        assert!(!check.live);
    }

    #[tokio::test]
    #[ignore]
    async fn test_check_live_network() {
        let client_id = std::env::var("TWITCH_CLIENT_ID").expect("TWITCH_CLIENT_ID not set");
        let secret = std::env::var("TWITCH_CLIENT_SECRET").expect("TWITCH_CLIENT_SECRET not set");
        let checker = TwitchChecker::new(default_client(), Some(client_id), Some(secret));
        let check = checker.check_live("ninja", None).await.unwrap();
        println!("{check:?}");
    }
}
