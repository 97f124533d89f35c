//! Live-status checkers for streaming platforms.
//!
//! This crate answers one question per platform: "is this account live
//! right now?". It provides the [`checker::PlatformChecker`] strategy trait,
//! one implementation per supported platform (YouTube, Twitch, TikTok, Kick)
//! and a [`checker::CheckerRegistry`] to dispatch by platform.

pub mod checker;

pub use checker::{
    Checker, CheckerError, CheckerRegistry, CheckerSettings, LiveCheck, Platform, PlatformChecker,
    default_client, default_registry,
};
