//! Minimum-spacing gate for platforms that throttle aggressive pollers.
//!
//! Unlike a token bucket there is no burst allowance: every request must be
//! at least the configured spacing after the previous one, process-wide.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::trace;

/// Enforces a minimum interval between consecutive requests.
///
/// The gate is shared across accounts: two checks for different accounts on
/// the same platform still serialize through one clock.
#[derive(Debug)]
pub struct RequestPacer {
    min_spacing: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_dispatch: Mutex::new(None),
        }
    }

    pub fn min_spacing(&self) -> Duration {
        self.min_spacing
    }

    /// Wait until the minimum spacing since the last dispatch has elapsed,
    /// then record the new dispatch time. Returns the duration waited.
    ///
    /// # Cancel Safety
    ///
    /// This method is cancel-safe. The mutex is only held for the elapsed
    /// check; the sleep happens with the lock released, and the loop retries
    /// so a concurrent caller that slipped in during the sleep is accounted
    /// for on the next pass.
    pub async fn acquire(&self) -> Duration {
        let mut total_wait = Duration::ZERO;

        loop {
            // Phase 1: check spacing and try to claim the slot (with lock)
            let wait_duration = {
                let mut last = self.last_dispatch.lock().await;
                let now = Instant::now();

                match *last {
                    Some(previous) => {
                        let elapsed = now.duration_since(previous);
                        if elapsed >= self.min_spacing {
                            *last = Some(now);
                            return total_wait;
                        }
                        self.min_spacing - elapsed
                    }
                    None => {
                        *last = Some(now);
                        return total_wait;
                    }
                }
            }; // lock released here

            // Phase 2: wait without holding the lock, then retry
            trace!(wait = ?wait_duration, "request paced");
            tokio::time::sleep(wait_duration).await;
            total_wait += wait_duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_first_acquire_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_millis(50));
        let waited = pacer.acquire().await;
        assert_eq!(waited, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_back_to_back_acquires_are_spaced() {
        let spacing = Duration::from_millis(50);
        let pacer = RequestPacer::new(spacing);

        let start = Instant::now();
        pacer.acquire().await;
        pacer.acquire().await;

        assert!(
            start.elapsed() >= spacing,
            "second acquire dispatched after {:?}, expected >= {:?}",
            start.elapsed(),
            spacing
        );
    }

    #[tokio::test]
    async fn test_acquire_after_spacing_elapsed_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_millis(20));
        pacer.acquire().await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        let waited = pacer.acquire().await;
        assert_eq!(waited, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_acquire_cancel_safe() {
        let pacer = Arc::new(RequestPacer::new(Duration::from_millis(100)));
        pacer.acquire().await;

        // Second acquire has to wait; cancel it mid-sleep.
        let pacer_clone = pacer.clone();
        let handle = tokio::spawn(async move { pacer_clone.acquire().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.abort();
        let _ = handle.await;

        // The pacer must still be usable. If the mutex were held across the
        // sleep, this would deadlock.
        let waited = tokio::time::timeout(Duration::from_secs(1), pacer.acquire())
            .await
            .expect("acquire should not deadlock after cancellation");
        assert!(waited <= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_concurrent_acquires_serialize() {
        let spacing = Duration::from_millis(30);
        let pacer = Arc::new(RequestPacer::new(spacing));

        let mut handles = vec![];
        for _ in 0..4 {
            let pacer_clone = pacer.clone();
            handles.push(tokio::spawn(async move {
                pacer_clone.acquire().await;
                Instant::now()
            }));
        }

        let result =
            tokio::time::timeout(Duration::from_secs(2), futures::future::join_all(handles)).await;
        let mut timestamps: Vec<Instant> = result
            .expect("concurrent acquires should not deadlock")
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        timestamps.sort();

        for pair in timestamps.windows(2) {
            let gap = pair[1].duration_since(pair[0]);
            // Allow a small scheduling tolerance below the nominal spacing.
            assert!(
                gap >= spacing - Duration::from_millis(5),
                "dispatches only {gap:?} apart"
            );
        }
    }
}
