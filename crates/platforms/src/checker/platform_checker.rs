use std::str::FromStr;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;

use super::default::DEFAULT_UA;
use super::error::CheckerError;
use super::platform::Platform;

/// Outcome of a single live check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveCheck {
    /// Whether the account is currently live.
    pub live: bool,
    /// Canonical platform identifier resolved during this check, if any.
    /// Callers should persist it so later checks skip resolution.
    pub resolved_id: Option<String>,
}

impl LiveCheck {
    pub fn new(live: bool) -> Self {
        Self {
            live,
            resolved_id: None,
        }
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    pub fn with_resolved_id<S: Into<String>>(mut self, id: S) -> Self {
        self.resolved_id = Some(id.into());
        self
    }
}

/// Base checker holding the HTTP client and platform-specific headers.
///
/// Each platform checker embeds one of these; the defaults make requests look
/// like an ordinary browser, and platforms layer their own headers on top.
#[derive(Debug, Clone)]
pub struct Checker {
    // The reqwest client
    pub client: Client,
    // platform-specific headers
    platform_headers: HeaderMap,
}

impl Checker {
    pub fn new(client: Client) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        // Do not set `Accept-Encoding` here.
        // Reqwest auto-adds it (and auto-decompresses) when the corresponding
        // crate features are enabled, as long as we don't override the header.

        Self {
            client,
            platform_headers: default_headers,
        }
    }

    #[inline]
    pub fn set_origin_and_referer_static(&mut self, base_url: &'static str) {
        let v = HeaderValue::from_static(base_url);
        self.platform_headers
            .insert(reqwest::header::ORIGIN, v.clone());
        self.platform_headers.insert(reqwest::header::REFERER, v);
    }

    pub fn add_header_str<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderName::from_str(key.as_ref()) {
            Ok(name) => match HeaderValue::from_str(value.as_ref()) {
                Ok(value) => {
                    self.platform_headers.insert(name, value);
                }
                Err(e) => {
                    debug!(error = %e, "Invalid header value; skipping");
                }
            },
            Err(e) => {
                debug!(error = %e, "Invalid header name; skipping");
            }
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Create an HTTP request with the platform headers pre-applied.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.platform_headers.clone())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.platform_headers
    }
}

/// Strategy interface answering "is this account live right now?".
///
/// Implementations are long-lived: they own per-platform state such as the
/// Twitch token cache and the Kick pacing clock, so one instance per platform
/// is shared for the lifetime of the process.
#[async_trait]
pub trait PlatformChecker: Send + Sync {
    /// Platform this checker handles.
    fn platform(&self) -> Platform;

    /// Check whether the account is currently live.
    ///
    /// `resolved_id` is the cached canonical identifier from an earlier
    /// check, on platforms that use one.
    async fn check_live(
        &self,
        username: &str,
        resolved_id: Option<&str>,
    ) -> Result<LiveCheck, CheckerError>;

    /// Public watch URL for the account, used in notification payloads.
    fn live_url(&self, username: &str, resolved_id: Option<&str>) -> String;
}
