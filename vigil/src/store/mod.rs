//! Tracked-account model and repository trait.

mod json;

pub use json::JsonFileStore;

use async_trait::async_trait;
use platforms_probe::Platform;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Unique key of a tracked account: (platform, lowercased username).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountKey {
    pub platform: Platform,
    pub username: String,
}

impl AccountKey {
    /// Usernames are case-insensitive on every supported platform, so the
    /// key normalizes to lowercase and `Ninja` addresses the same entry as
    /// `ninja`.
    pub fn new(platform: Platform, username: &str) -> Self {
        Self {
            platform,
            username: username.to_lowercase(),
        }
    }
}

impl std::fmt::Display for AccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.platform, self.username)
    }
}

/// An account the system watches for live status.
///
/// Immutable once stored, except for deletion and the one-time
/// `resolved_id` write-back after the first successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedAccount {
    pub platform: Platform,
    pub username: String,
    pub display_name: String,
    /// Cached canonical platform identifier (e.g. a YouTube channel id),
    /// resolved once so later checks skip resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_id: Option<String>,
}

impl TrackedAccount {
    pub fn new(platform: Platform, username: impl Into<String>, display_name: Option<String>) -> Self {
        let username = username.into();
        let display_name = display_name.unwrap_or_else(|| username.clone());
        Self {
            platform,
            username,
            display_name,
            resolved_id: None,
        }
    }

    pub fn key(&self) -> AccountKey {
        AccountKey::new(self.platform, &self.username)
    }
}

/// Repository of tracked accounts, injected into the scheduler.
#[async_trait]
pub trait TrackingStore: Send + Sync {
    /// All tracked accounts, in storage order.
    async fn list(&self) -> Result<Vec<TrackedAccount>>;

    async fn get(&self, key: &AccountKey) -> Result<Option<TrackedAccount>>;

    /// Insert or replace the account with the same key.
    async fn put(&self, account: TrackedAccount) -> Result<()>;

    /// Delete by key. Returns whether an entry existed.
    async fn delete(&self, key: &AccountKey) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalizes_username_case() {
        let a = AccountKey::new(Platform::Twitch, "Ninja");
        let b = AccountKey::new(Platform::Twitch, "ninja");
        assert_eq!(a, b);

        let other_platform = AccountKey::new(Platform::Kick, "ninja");
        assert_ne!(a, other_platform);
    }

    #[test]
    fn test_display_name_defaults_to_username() {
        let account = TrackedAccount::new(Platform::TikTok, "creator", None);
        assert_eq!(account.display_name, "creator");

        let named =
            TrackedAccount::new(Platform::TikTok, "creator", Some("The Creator".to_string()));
        assert_eq!(named.display_name, "The Creator");
    }

    #[test]
    fn test_account_key_roundtrip() {
        let account = TrackedAccount::new(Platform::Twitch, "Ninja", None);
        assert_eq!(account.key(), AccountKey::new(Platform::Twitch, "ninja"));
        assert_eq!(account.key().to_string(), "twitch/ninja");
    }
}
