//! Kick live checker: structured API first, page scrape as fallback.
//!
//! Kick's channel-info endpoint sits behind aggressive bot protection. The
//! checker spoofs a rotating browser identity and paces every request
//! through a shared [`RequestPacer`]; when the API answers 403 anyway it
//! falls back to scraping the public channel page exactly once. Any other
//! API failure propagates to the scheduler, which logs it and treats the
//! account as not-live for the cycle.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::checker::default::random_user_agent;
use crate::checker::error::CheckerError;
use crate::checker::heuristics::{self, KICK_PREDICATES};
use crate::checker::pacing::RequestPacer;
use crate::checker::platform::Platform;
use crate::checker::platform_checker::{Checker, LiveCheck, PlatformChecker};

const BASE_URL: &str = "https://kick.com";
const API_PATH: &str = "api/v2/channels";

/// Only an access-denied answer triggers the scrape fallback; everything
/// else is a real error the caller should see.
pub(crate) fn should_fallback(status: StatusCode) -> bool {
    status == StatusCode::FORBIDDEN
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    /// Non-null while the channel is broadcasting.
    #[serde(default)]
    livestream: Option<serde_json::Value>,
}

pub struct KickChecker {
    checker: Checker,
    pacer: RequestPacer,
    base_url: String,
}

impl KickChecker {
    pub fn new(client: Client, request_spacing: Duration) -> Self {
        Self::with_base_url(client, request_spacing, BASE_URL)
    }

    fn with_base_url(client: Client, request_spacing: Duration, base_url: &str) -> Self {
        Self {
            checker: Checker::new(client),
            pacer: RequestPacer::new(request_spacing),
            base_url: base_url.to_string(),
        }
    }

    /// Build a paced request that looks like a browser on the channel page.
    async fn spoofed_get(&self, url: &str, slug: &str) -> reqwest::RequestBuilder {
        self.pacer.acquire().await;
        let channel_url = format!("{}/{slug}", self.base_url);
        self.checker
            .get(url)
            .header(reqwest::header::USER_AGENT, random_user_agent())
            .header(reqwest::header::REFERER, channel_url)
            .header(reqwest::header::ORIGIN, self.base_url.as_str())
    }

    /// Step 1: the structured channel-info endpoint.
    ///
    /// `Ok(Some(live))` is conclusive; `Ok(None)` means access denied and the
    /// page scrape should decide.
    async fn check_via_api(&self, slug: &str) -> Result<Option<bool>, CheckerError> {
        let url = format!("{}/{API_PATH}/{slug}", self.base_url);
        let response = self.spoofed_get(&url, slug).await.send().await?;

        let status = response.status();
        if should_fallback(status) {
            debug!(slug, "Kick API denied access, falling back to page scrape");
            return Ok(None);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CheckerError::NotFound(format!("Kick channel {slug}")));
        }
        if !status.is_success() {
            return Err(CheckerError::BadStatus(status));
        }

        let body: ChannelResponse = response.json().await?;
        Ok(Some(body.livestream.is_some()))
    }

    /// Step 2: scrape the public channel page.
    async fn check_via_page(&self, slug: &str) -> Result<bool, CheckerError> {
        let url = format!("{}/{slug}", self.base_url);
        let response = self.spoofed_get(&url, slug).await.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckerError::BadStatus(status));
        }

        let body = response.text().await?;
        Ok(heuristics::evaluate(KICK_PREDICATES, &body).is_some())
    }
}

#[async_trait]
impl PlatformChecker for KickChecker {
    fn platform(&self) -> Platform {
        Platform::Kick
    }

    async fn check_live(
        &self,
        username: &str,
        _resolved_id: Option<&str>,
    ) -> Result<LiveCheck, CheckerError> {
        match self.check_via_api(username).await? {
            Some(live) => Ok(LiveCheck::new(live)),
            None => {
                let live = self.check_via_page(username).await?;
                Ok(LiveCheck::new(live))
            }
        }
    }

    fn live_url(&self, username: &str, _resolved_id: Option<&str>) -> String {
        format!("{}/{username}", self.base_url)
    }
}
