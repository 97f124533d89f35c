//! YouTube live checker backed by the Data API v3.
//!
//! Identities come in two shapes: a canonical channel id (`UC…`) or a raw
//! handle/username. Handles are resolved to a channel id once, through a
//! two-step fallback (channel search, then the legacy `forUsername` lookup),
//! and the resolved id is reported back to the caller for caching.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::checker::error::CheckerError;
use crate::checker::platform::Platform;
use crate::checker::platform_checker::{Checker, LiveCheck, PlatformChecker};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const CHANNELS_URL: &str = "https://www.googleapis.com/youtube/v3/channels";

/// Canonical channel ids are 24 characters starting with `UC`.
pub(crate) fn is_canonical_channel_id(identity: &str) -> bool {
    identity.len() == 24
        && identity.starts_with("UC")
        && identity.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// A resolution call is only needed when no id is cached and the identity is
/// not already canonical.
pub(crate) fn needs_resolution(username: &str, resolved_id: Option<&str>) -> bool {
    resolved_id.is_none() && !is_canonical_channel_id(username)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    #[serde(default)]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
}

pub struct YoutubeChecker {
    checker: Checker,
    api_key: Option<String>,
}

impl YoutubeChecker {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            checker: Checker::new(client),
            api_key,
        }
    }

    /// Resolve a handle/username to a canonical channel id.
    ///
    /// Tries a channel search first (works for handles), then falls back to
    /// the legacy `forUsername` lookup.
    async fn resolve_channel_id(
        &self,
        username: &str,
        api_key: &str,
    ) -> Result<Option<String>, CheckerError> {
        let response = self
            .checker
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "channel"),
                ("maxResults", "1"),
                ("q", username),
                ("key", api_key),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            let body: SearchResponse = response.json().await?;
            if let Some(id) = body
                .items
                .into_iter()
                .find_map(|item| item.snippet.and_then(|s| s.channel_id))
            {
                debug!(username, channel_id = %id, "resolved channel via search");
                return Ok(Some(id));
            }
        } else {
            debug!(username, status = %response.status(), "channel search rejected");
        }

        // Legacy lookup only works for old-style usernames, but it is free to
        // try when the search came up empty.
        let response = self
            .checker
            .get(CHANNELS_URL)
            .query(&[("part", "id"), ("forUsername", username), ("key", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(username, status = %response.status(), "forUsername lookup rejected");
            return Ok(None);
        }

        let body: ChannelsResponse = response.json().await?;
        Ok(body.items.into_iter().next().map(|item| item.id))
    }

    async fn is_channel_live(&self, channel_id: &str, api_key: &str) -> Result<bool, CheckerError> {
        let response = self
            .checker
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("eventType", "live"),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CheckerError::BadStatus(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        Ok(!body.items.is_empty())
    }
}

#[async_trait]
impl PlatformChecker for YoutubeChecker {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    /// Never errors: every failure degrades to not-live with a diagnostic.
    async fn check_live(
        &self,
        username: &str,
        resolved_id: Option<&str>,
    ) -> Result<LiveCheck, CheckerError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!(username, "YouTube API key not configured, reporting not-live");
            return Ok(LiveCheck::offline());
        };

        // Prefer the cached id; accept a canonical id passed as the username.
        let (channel_id, freshly_resolved) = if !needs_resolution(username, resolved_id) {
            (resolved_id.unwrap_or(username).to_string(), false)
        } else {
            match self.resolve_channel_id(username, api_key).await {
                Ok(Some(id)) => (id, true),
                Ok(None) => {
                    warn!(username, "could not resolve YouTube channel id");
                    return Ok(LiveCheck::offline());
                }
                Err(e) => {
                    warn!(username, error = %e, "YouTube channel resolution failed");
                    return Ok(LiveCheck::offline());
                }
            }
        };

        let live = match self.is_channel_live(&channel_id, api_key).await {
            Ok(live) => live,
            Err(e) => {
                warn!(username, channel_id = %channel_id, error = %e, "YouTube live check failed");
                false
            }
        };

        let mut check = LiveCheck::new(live);
        if freshly_resolved {
            check = check.with_resolved_id(channel_id);
        }
        Ok(check)
    }

    fn live_url(&self, username: &str, resolved_id: Option<&str>) -> String {
        match resolved_id {
            Some(id) => format!("https://www.youtube.com/channel/{id}/live"),
            None if is_canonical_channel_id(username) => {
                format!("https://www.youtube.com/channel/{username}/live")
            }
            None => format!("https://www.youtube.com/@{username}/live"),
        }
    }
}
