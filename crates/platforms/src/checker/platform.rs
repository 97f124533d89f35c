//! Identifiers for the supported streaming platforms.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A streaming platform supported by the live checkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    Twitch,
    TikTok,
    Kick,
}

impl Platform {
    /// All supported platforms, in registration order.
    pub const ALL: [Platform; 4] = [
        Platform::YouTube,
        Platform::Twitch,
        Platform::TikTok,
        Platform::Kick,
    ];

    /// Lowercase identifier used in config files, CLI arguments and
    /// notification payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::Twitch => "twitch",
            Platform::TikTok => "tiktok",
            Platform::Kick => "kick",
        }
    }

    /// Human-facing platform name.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Twitch => "Twitch",
            Platform::TikTok => "TikTok",
            Platform::Kick => "Kick",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "youtube" => Ok(Platform::YouTube),
            "twitch" => Ok(Platform::Twitch),
            "tiktok" => Ok(Platform::TikTok),
            "kick" => Ok(Platform::Kick),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_any_case() {
        assert_eq!("twitch".parse::<Platform>().unwrap(), Platform::Twitch);
        assert_eq!("TikTok".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!("YOUTUBE".parse::<Platform>().unwrap(), Platform::YouTube);
        assert_eq!("Kick".parse::<Platform>().unwrap(), Platform::Kick);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("rumble".parse::<Platform>().is_err());
        assert!("".parse::<Platform>().is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string(), platform.as_str());
        }
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&Platform::YouTube).unwrap();
        assert_eq!(json, "\"youtube\"");
        let parsed: Platform = serde_json::from_str("\"kick\"").unwrap();
        assert_eq!(parsed, Platform::Kick);
    }
}
