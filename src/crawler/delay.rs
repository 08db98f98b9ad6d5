//! Request pacing policies
//!
//! The fetcher sleeps a jittered interval before every network request and an
//! exponential backoff between retries. Both are supplied by a [`DelayPolicy`]
//! so tests can run without real waits.

use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// Cap on a single backoff wait
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Floor on a single backoff wait
const MIN_BACKOFF: Duration = Duration::from_secs(2);

/// Source of pre-fetch jitter and retry backoff durations
pub trait DelayPolicy: Send + Sync {
    /// Wait before issuing a network request
    fn jitter(&self) -> Duration;

    /// Wait before retry number `attempt` (1-based)
    fn backoff(&self, attempt: u32) -> Duration;
}

/// Uniformly random jitter with capped exponential backoff
#[derive(Debug, Clone)]
pub struct RandomJitter {
    min: Duration,
    max: Duration,
}

impl RandomJitter {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_jitter_ms),
            Duration::from_millis(config.max_jitter_ms),
        )
    }
}

impl DelayPolicy for RandomJitter {
    fn jitter(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let millis = rand::thread_rng().gen_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(millis as u64)
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(5);
        let wait = Duration::from_secs(1u64 << exponent);
        wait.clamp(MIN_BACKOFF, MAX_BACKOFF)
    }
}

/// Policy that never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayPolicy for NoDelay {
    fn jitter(&self) -> Duration {
        Duration::ZERO
    }

    fn backoff(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_within_bounds() {
        let policy = RandomJitter::new(Duration::from_millis(1000), Duration::from_millis(5000));
        for _ in 0..100 {
            let wait = policy.jitter();
            assert!(wait >= Duration::from_millis(1000));
            assert!(wait <= Duration::from_millis(5000));
        }
    }

    #[test]
    fn test_jitter_degenerate_range() {
        let policy = RandomJitter::new(Duration::from_millis(250), Duration::from_millis(250));
        assert_eq!(policy.jitter(), Duration::from_millis(250));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RandomJitter::new(Duration::ZERO, Duration::ZERO);
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
        assert_eq!(policy.backoff(5), Duration::from_secs(30));
        assert_eq!(policy.backoff(12), Duration::from_secs(30));
    }

    #[test]
    fn test_no_delay() {
        assert_eq!(NoDelay.jitter(), Duration::ZERO);
        assert_eq!(NoDelay.backoff(3), Duration::ZERO);
    }
}
