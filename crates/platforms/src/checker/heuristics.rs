//! Scrape-based live-detection heuristics.
//!
//! On platforms without a usable API the only signal is the public page
//! markup. Each heuristic is a named predicate over the raw HTML; a page is
//! considered live when any predicate in the platform's ordered list matches.
//! Keeping the predicates named and independent lets drift in the markup be
//! diagnosed per-predicate instead of as one opaque boolean.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// A named live-indicator predicate over fetched page markup.
pub struct LivePredicate {
    pub name: &'static str,
    check: fn(&str) -> bool,
}

impl LivePredicate {
    pub fn matches(&self, body: &str) -> bool {
        (self.check)(body)
    }
}

/// Evaluate an ordered predicate list against the page body.
///
/// Returns the name of the first matching predicate, or `None` when no
/// heuristic fired (not live, or the markup changed under us).
pub fn evaluate(predicates: &[LivePredicate], body: &str) -> Option<&'static str> {
    for predicate in predicates {
        if predicate.matches(body) {
            debug!(predicate = predicate.name, "live marker matched");
            return Some(predicate.name);
        }
    }
    None
}

static TITLE_LIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>[^<]*\bLIVE\b[^<]*</title>").unwrap());

static META_TITLE_LIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta[^>]+(?:og:title|twitter:title)[^>]+content="[^"]*\bLIVE\b[^"]*""#)
        .unwrap()
});

static TIKTOK_STATUS_LIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:status|liveStatus)"\s*:\s*2\b"#).unwrap());

static KICK_LIVE_FLAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""is_live"\s*:\s*true|"isLive"\s*:\s*true|"livestream"\s*:\s*\{"#).unwrap()
});

/// `<title>`/`og:title` text carrying a LIVE marker.
fn title_live_marker(body: &str) -> bool {
    TITLE_LIVE_REGEX.is_match(body) || META_TITLE_LIVE_REGEX.is_match(body)
}

/// DOM markers of TikTok's live-room player.
fn tiktok_live_room_markers(body: &str) -> bool {
    body.contains("tiktok-live-room")
        || body.contains("\"LiveRoom\"")
        || body.contains("live-room-container")
}

/// Visible body phrases TikTok renders on an active live page.
fn tiktok_body_live_phrase(body: &str) -> bool {
    body.contains("is LIVE") || body.contains("LIVE now") || body.contains("Watch LIVE")
}

/// SIGI_STATE-style structured data reporting an active room.
fn tiktok_structured_live_status(body: &str) -> bool {
    body.contains("\"liveRoomUserInfo\"") && TIKTOK_STATUS_LIVE_REGEX.is_match(body)
}

/// DOM markers of Kick's stream player container.
fn kick_live_container_markers(body: &str) -> bool {
    body.contains("channel-livestream") || body.contains("stream-player")
}

/// Visible body phrases Kick renders for an active channel.
fn kick_body_live_phrase(body: &str) -> bool {
    body.contains("is live") || body.contains("Live now")
}

/// Inline script state carrying a live flag or embedded livestream object.
fn kick_inline_live_flag(body: &str) -> bool {
    KICK_LIVE_FLAG_REGEX.is_match(body)
}

/// Ordered predicate list for TikTok live pages.
pub const TIKTOK_PREDICATES: &[LivePredicate] = &[
    LivePredicate {
        name: "title-live-marker",
        check: title_live_marker,
    },
    LivePredicate {
        name: "live-room-markers",
        check: tiktok_live_room_markers,
    },
    LivePredicate {
        name: "body-live-phrase",
        check: tiktok_body_live_phrase,
    },
    LivePredicate {
        name: "structured-live-status",
        check: tiktok_structured_live_status,
    },
];

/// Ordered predicate list for Kick channel pages.
pub const KICK_PREDICATES: &[LivePredicate] = &[
    LivePredicate {
        name: "title-live-marker",
        check: title_live_marker,
    },
    LivePredicate {
        name: "live-container-markers",
        check: kick_live_container_markers,
    },
    LivePredicate {
        name: "body-live-phrase",
        check: kick_body_live_phrase,
    },
    LivePredicate {
        name: "inline-live-flag",
        check: kick_inline_live_flag,
    },
];
