use std::collections::HashMap;
use std::time::Duration;

use super::platform::Platform;
use super::platform_checker::PlatformChecker;

/// Credentials and pacing knobs consumed when building the default checkers.
///
/// Every credential is optional: a platform with missing credentials degrades
/// to always-not-live with a diagnostic instead of failing.
#[derive(Debug, Clone)]
pub struct CheckerSettings {
    /// YouTube Data API v3 key.
    pub youtube_api_key: Option<String>,
    /// Twitch application client id.
    pub twitch_client_id: Option<String>,
    /// Twitch application client secret.
    pub twitch_client_secret: Option<String>,
    /// Minimum spacing between consecutive Kick requests.
    pub kick_request_spacing: Duration,
}

impl Default for CheckerSettings {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            twitch_client_id: None,
            twitch_client_secret: None,
            kick_request_spacing: Duration::from_millis(3000),
        }
    }
}

/// Registry of live checkers keyed by platform.
pub struct CheckerRegistry {
    checkers: HashMap<Platform, Box<dyn PlatformChecker>>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self {
            checkers: HashMap::new(),
        }
    }

    /// Register a checker under the platform it reports.
    ///
    /// A later registration for the same platform replaces the earlier one.
    pub fn register(&mut self, checker: Box<dyn PlatformChecker>) {
        self.checkers.insert(checker.platform(), checker);
    }

    pub fn get(&self, platform: Platform) -> Option<&dyn PlatformChecker> {
        self.checkers.get(&platform).map(|c| c.as_ref())
    }

    /// Platforms with a registered checker.
    pub fn platforms(&self) -> Vec<Platform> {
        self.checkers.keys().copied().collect()
    }
}

impl Default for CheckerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::checker::error::CheckerError;
    use crate::checker::platform_checker::LiveCheck;

    struct StubChecker(Platform);

    #[async_trait]
    impl PlatformChecker for StubChecker {
        fn platform(&self) -> Platform {
            self.0
        }

        async fn check_live(
            &self,
            _username: &str,
            _resolved_id: Option<&str>,
        ) -> Result<LiveCheck, CheckerError> {
            Ok(LiveCheck::offline())
        }

        fn live_url(&self, username: &str, _resolved_id: Option<&str>) -> String {
            format!("https://example.com/{username}")
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = CheckerRegistry::new();
        registry.register(Box::new(StubChecker(Platform::Twitch)));

        assert!(registry.get(Platform::Twitch).is_some());
        assert!(registry.get(Platform::Kick).is_none());
        assert_eq!(registry.platforms(), vec![Platform::Twitch]);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = CheckerRegistry::new();
        registry.register(Box::new(StubChecker(Platform::Kick)));
        registry.register(Box::new(StubChecker(Platform::Kick)));

        assert_eq!(registry.platforms().len(), 1);
    }

    #[test]
    fn test_default_settings() {
        let settings = CheckerSettings::default();
        assert!(settings.youtube_api_key.is_none());
        assert_eq!(settings.kick_request_spacing, Duration::from_millis(3000));
    }
}
