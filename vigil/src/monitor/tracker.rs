//! Edge-triggered live-state tracking.
//!
//! The tracker owns the in-memory `key -> live` map. State is deliberately
//! not persisted: on restart everything starts offline, so the first poll
//! only records status and a stream already live across the restart does not
//! re-fire its notification.

use std::collections::{HashMap, HashSet};

use crate::store::AccountKey;

/// Result of comparing an observation against the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// offline/absent -> live. The only transition that notifies.
    WentLive,
    /// live -> offline. Logged, never notified.
    WentOffline,
    /// No change.
    None,
}

#[derive(Debug, Default)]
pub struct LiveStatusTracker {
    states: HashMap<AccountKey, bool>,
}

impl LiveStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation and return the transition it caused.
    ///
    /// An absent key counts as offline, so the first `true` observation for
    /// a key is a live transition and the first `false` just records state.
    pub fn evaluate(&mut self, key: AccountKey, observed_live: bool) -> Transition {
        let previous = self.states.insert(key, observed_live).unwrap_or(false);
        match (previous, observed_live) {
            (false, true) => Transition::WentLive,
            (true, false) => Transition::WentOffline,
            _ => Transition::None,
        }
    }

    /// Drop the state for a removed account so a later re-add of the same
    /// key starts from absent.
    pub fn remove(&mut self, key: &AccountKey) {
        self.states.remove(key);
    }

    /// Drop state for keys no longer tracked (accounts removed out-of-band
    /// while the scheduler runs).
    pub fn retain_keys(&mut self, tracked: &HashSet<AccountKey>) {
        self.states.retain(|key, _| tracked.contains(key));
    }

    pub fn is_live(&self, key: &AccountKey) -> bool {
        self.states.get(key).copied().unwrap_or(false)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use platforms_probe::Platform;

    use super::*;

    fn key(username: &str) -> AccountKey {
        AccountKey::new(Platform::Twitch, username)
    }

    #[test]
    fn test_first_live_observation_fires() {
        let mut tracker = LiveStatusTracker::new();
        assert_eq!(tracker.evaluate(key("ninja"), true), Transition::WentLive);
        assert!(tracker.is_live(&key("ninja")));
    }

    #[test]
    fn test_first_offline_observation_only_records() {
        let mut tracker = LiveStatusTracker::new();
        assert_eq!(tracker.evaluate(key("ninja"), false), Transition::None);
        assert!(!tracker.is_live(&key("ninja")));
    }

    #[test]
    fn test_sustained_live_is_idempotent() {
        let mut tracker = LiveStatusTracker::new();
        assert_eq!(tracker.evaluate(key("ninja"), true), Transition::WentLive);
        assert_eq!(tracker.evaluate(key("ninja"), true), Transition::None);
        assert_eq!(tracker.evaluate(key("ninja"), true), Transition::None);
    }

    #[test]
    fn test_offline_then_live_fires_again() {
        let mut tracker = LiveStatusTracker::new();
        tracker.evaluate(key("ninja"), true);
        assert_eq!(tracker.evaluate(key("ninja"), false), Transition::WentOffline);
        assert_eq!(tracker.evaluate(key("ninja"), true), Transition::WentLive);
    }

    #[test]
    fn test_notification_fires_iff_offline_to_live_edge() {
        // property check over an arbitrary observation sequence
        let sequence = [false, true, true, false, false, true, false, true, true];
        let mut tracker = LiveStatusTracker::new();
        let mut previous = false;
        for observed in sequence {
            let transition = tracker.evaluate(key("ninja"), observed);
            assert_eq!(
                transition == Transition::WentLive,
                !previous && observed,
                "observed={observed} previous={previous}"
            );
            previous = observed;
        }
    }

    #[test]
    fn test_remove_resets_to_absent() {
        let mut tracker = LiveStatusTracker::new();
        tracker.evaluate(key("ninja"), true);
        tracker.remove(&key("ninja"));

        // Re-add starts from absent: a live observation fires again.
        assert_eq!(tracker.evaluate(key("ninja"), true), Transition::WentLive);
    }

    #[test]
    fn test_retain_keys_prunes_untracked_state() {
        let mut tracker = LiveStatusTracker::new();
        tracker.evaluate(key("ninja"), true);
        tracker.evaluate(key("other"), false);

        let tracked: HashSet<AccountKey> = [key("other")].into();
        tracker.retain_keys(&tracked);

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.evaluate(key("ninja"), true), Transition::WentLive);
    }
}
