//! App-access token cache for the Helix API.
//!
//! A two-state machine: `Empty` until a client-credentials grant succeeds,
//! `Valid` afterwards. No proactive expiry tracking — a stale token is
//! detected reactively when a Helix call answers 401, at which point the
//! caller invalidates the slot and the next check re-acquires.

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::checker::error::CheckerError;

const TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

#[derive(Debug)]
enum TokenState {
    Empty,
    Valid(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug)]
pub struct TokenCache {
    state: Mutex<TokenState>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TokenState::Empty),
        }
    }

    /// Return the cached token, acquiring one via the client-credentials
    /// grant when the slot is empty. A failed grant leaves the slot empty so
    /// the next call retries.
    pub async fn ensure(
        &self,
        client: &Client,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, CheckerError> {
        let mut state = self.state.lock().await;

        if let TokenState::Valid(token) = &*state {
            return Ok(token.clone());
        }

        let response = client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckerError::TokenAcquisition(format!("{status}: {body}")));
        }

        let body: TokenResponse = response.json().await?;
        debug!("acquired Twitch app access token");
        *state = TokenState::Valid(body.access_token.clone());
        Ok(body.access_token)
    }

    /// Drop the cached token. Called on a downstream auth rejection.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if matches!(*state, TokenState::Valid(_)) {
            debug!("invalidating cached Twitch token");
        }
        *state = TokenState::Empty;
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        matches!(*self.state.lock().await, TokenState::Empty)
    }

    #[cfg(test)]
    pub(crate) async fn seed(&self, token: &str) {
        *self.state.lock().await = TokenState::Valid(token.to_string());
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_parses() {
        let json = r#"{"access_token":"abc123","expires_in":5011271,"token_type":"bearer"}"#;
        let parsed: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "abc123");
    }

    #[tokio::test]
    async fn test_cache_starts_empty() {
        let cache = TokenCache::new();
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_seeded_token_is_reused_without_a_grant() {
        let cache = TokenCache::new();
        cache.seed("cached").await;

        // The dummy credentials would fail a real grant; the cached token
        // short-circuits before any request is made.
        let token = cache
            .ensure(&Client::new(), "id", "secret")
            .await
            .unwrap();
        assert_eq!(token, "cached");
    }

    #[tokio::test]
    async fn test_invalidate_empties_the_slot() {
        let cache = TokenCache::new();
        cache.seed("cached").await;
        cache.invalidate().await;
        assert!(cache.is_empty().await);

        // Invalidating an already-empty slot is a no-op.
        cache.invalidate().await;
        assert!(cache.is_empty().await);
    }
}
