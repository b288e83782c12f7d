//! Nonce source
//!
//! Kraken rejects a nonce that is not larger than the last one it accepted
//! for the same key. Nonces here are the millisecond Unix clock, bumped past
//! the last issued value when two calls land in the same millisecond or the
//! clock steps backwards.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide, strictly increasing nonce generator.
#[derive(Debug, Default)]
pub struct NonceSource {
    last_issued: AtomicU64,
}

impl NonceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh nonce from the wall clock.
    pub fn issue(&self) -> u64 {
        self.issue_at(now_millis())
    }

    /// Issue a fresh nonce as if the clock read `now_ms`.
    pub fn issue_at(&self, now_ms: u64) -> u64 {
        let bump = |last: u64| now_ms.max(last.saturating_add(1));
        let previous = match self
            .last_issued
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(bump(last)))
        {
            Ok(previous) | Err(previous) => previous,
        };
        bump(previous)
    }
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_follows_clock() {
        let source = NonceSource::new();
        assert_eq!(source.issue_at(1_000), 1_000);
        assert_eq!(source.issue_at(2_500), 2_500);
    }

    #[test]
    fn test_same_millisecond_is_bumped() {
        let source = NonceSource::new();
        assert_eq!(source.issue_at(1_000), 1_000);
        assert_eq!(source.issue_at(1_000), 1_001);
        assert_eq!(source.issue_at(1_000), 1_002);
    }

    #[test]
    fn test_clock_step_back_still_increases() {
        let source = NonceSource::new();
        source.issue_at(5_000);
        assert_eq!(source.issue_at(4_000), 5_001);
        assert_eq!(source.issue_at(6_000), 6_000);
    }

    #[test]
    fn test_wall_clock_nonce_is_epoch_millis() {
        let before = u64::try_from(Utc::now().timestamp_millis()).unwrap();
        let nonce = NonceSource::new().issue();
        let after = u64::try_from(Utc::now().timestamp_millis()).unwrap();
        assert!(nonce >= before && nonce <= after);
    }

    #[test]
    fn test_concurrent_issue_never_repeats() {
        let source = NonceSource::new();
        let per_thread = 1_000;
        let threads = 8;

        let issued: Vec<u64> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| scope.spawn(|| (0..per_thread).map(|_| source.issue_at(42)).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let unique: HashSet<u64> = issued.iter().copied().collect();
        assert_eq!(unique.len(), threads * per_thread);
        assert_eq!(source.issue_at(42), 42 + (threads * per_thread) as u64);
    }
}
