use reqwest::Client;

use super::platforms::{kick, tiktok, twitch, youtube};
use super::registry::{CheckerRegistry, CheckerSettings};

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Realistic browser user agents for rotation on scrape-heavy platforms.
pub(crate) const USER_AGENT_POOL: &[&str] = &[
    DEFAULT_UA,
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
];

/// Pick a random user agent from the pool.
///
/// Purely an anti-blocking heuristic, not security-relevant.
pub fn random_user_agent() -> &'static str {
    use rand::RngExt;
    let index = rand::rng().random_range(0..USER_AGENT_POOL.len());
    USER_AGENT_POOL[index]
}

pub fn default_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .expect("Failed to create HTTP client")
}

/// Returns a new `CheckerRegistry` populated with all the supported platforms.
pub fn default_registry(settings: CheckerSettings) -> CheckerRegistry {
    let client = default_client();
    let mut registry = CheckerRegistry::new();

    registry.register(Box::new(youtube::YoutubeChecker::new(
        client.clone(),
        settings.youtube_api_key,
    )));
    registry.register(Box::new(twitch::TwitchChecker::new(
        client.clone(),
        settings.twitch_client_id,
        settings.twitch_client_secret,
    )));
    registry.register(Box::new(tiktok::TikTokChecker::new(client.clone())));
    registry.register(Box::new(kick::KickChecker::new(
        client,
        settings.kick_request_spacing,
    )));

    registry
}
