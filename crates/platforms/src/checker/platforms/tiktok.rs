//! TikTok live checker, scrape-only.
//!
//! TikTok has no usable public API for live status, and its edge actively
//! blocks non-browser traffic, so the checker fetches the public live page
//! with a full browser header set and runs the markup through the named
//! heuristics in [`crate::checker::heuristics`]. Every failure mode yields
//! not-live; the error detail matters only for diagnostics.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use crate::checker::error::CheckerError;
use crate::checker::heuristics::{self, TIKTOK_PREDICATES};
use crate::checker::platform::Platform;
use crate::checker::platform_checker::{Checker, LiveCheck, PlatformChecker};

const BASE_URL: &str = "https://www.tiktok.com";

/// TikTok redirects `@user/live` to the profile page when the account is not
/// streaming; landing anywhere but a `/live` path is a conclusive "not live".
pub(crate) fn is_live_path(final_url: &Url) -> bool {
    final_url.path().trim_end_matches('/').ends_with("/live")
}

/// Liveness decision over the fetched page: a non-200 status or a redirect
/// off the live path is conclusively not-live, otherwise the markup
/// heuristics decide.
pub(crate) fn page_indicates_live(status: StatusCode, final_url: &Url, body: &str) -> bool {
    status.is_success()
        && is_live_path(final_url)
        && heuristics::evaluate(TIKTOK_PREDICATES, body).is_some()
}

pub struct TikTokChecker {
    checker: Checker,
}

impl TikTokChecker {
    pub fn new(client: Client) -> Self {
        let mut checker = Checker::new(client);
        checker.set_origin_and_referer_static(BASE_URL);
        Self { checker }
    }
}

#[async_trait]
impl PlatformChecker for TikTokChecker {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    /// Never errors: network failures, block pages and heuristic misses all
    /// report not-live.
    async fn check_live(
        &self,
        username: &str,
        _resolved_id: Option<&str>,
    ) -> Result<LiveCheck, CheckerError> {
        let url = self.live_url(username, None);

        let response = match self.checker.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(username, error = %e, "TikTok live page fetch failed");
                return Ok(LiveCheck::offline());
            }
        };

        let status = response.status();
        let final_url = response.url().clone();
        if status == StatusCode::FORBIDDEN {
            debug!(username, "TikTok blocked the request (403)");
        } else if status == StatusCode::NOT_FOUND {
            debug!(username, "TikTok live page not found (404)");
        } else if !status.is_success() {
            debug!(username, %status, "TikTok live page returned non-200");
        }
        if status.is_success() && !is_live_path(&final_url) {
            // Redirect-to-profile beats every positive marker.
            debug!(username, %final_url, "redirected off the live path");
        }

        let body = if status.is_success() {
            match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(username, error = %e, "failed to read TikTok live page body");
                    return Ok(LiveCheck::offline());
                }
            }
        } else {
            String::new()
        };

        Ok(LiveCheck::new(page_indicates_live(status, &final_url, &body)))
    }

    fn live_url(&self, username: &str, _resolved_id: Option<&str>) -> String {
        format!("{BASE_URL}/@{username}/live")
    }
}
