//! Inter-profile pacing.
//!
//! Profiles are processed strictly one after another with a jittered pause
//! in between, so the request rhythm never looks machine-regular.

use std::time::Duration;

use rand::prelude::*;
use tracing::info;

/// Delay window between two consecutive profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDelay {
    /// Minimum delay in milliseconds between requests
    pub min_ms: u64,
    /// Maximum delay in milliseconds between requests
    pub max_ms: u64,
}

impl RequestDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        if min_ms > max_ms {
            Self {
                min_ms: max_ms,
                max_ms: min_ms,
            }
        } else {
            Self { min_ms, max_ms }
        }
    }

    /// `secs` nominal, drawn from `[secs, 1.5 × secs]`.
    pub fn around_secs(secs: u64) -> Self {
        let base = secs.saturating_mul(1_000);
        Self::new(base, base.saturating_add(base / 2))
    }

    pub fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    pub fn is_none(&self) -> bool {
        self.max_ms == 0
    }

    /// Random delay within the window plus ±20% jitter, never below `min_ms`.
    pub fn random_delay(&self) -> u64 {
        if self.is_none() {
            return 0;
        }
        let mut rng = rand::rng();
        let base_delay = rng.random_range(self.min_ms..=self.max_ms);

        let jitter_range = (base_delay as f64 * 0.2) as i64;
        let jitter = rng.random_range(-jitter_range..=jitter_range);

        (base_delay as i64 + jitter).max(self.min_ms as i64) as u64
    }

    /// Sleep for one random delay; returns the milliseconds waited.
    pub async fn pause(&self) -> u64 {
        let delay = self.random_delay();
        if delay > 0 {
            info!("⏳ pacing: waiting {}ms before next profile", delay);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_never_drops_below_minimum() {
        let delay = RequestDelay::new(100, 200);
        for _ in 0..200 {
            let d = delay.random_delay();
            assert!(d >= 100, "{d}");
            assert!(d <= 240, "{d}");
        }
    }

    #[test]
    fn window_from_seconds_and_swapped_bounds() {
        assert_eq!(RequestDelay::around_secs(4), RequestDelay::new(4_000, 6_000));
        assert_eq!(RequestDelay::new(9, 3), RequestDelay::new(3, 9));
        assert_eq!(RequestDelay::around_secs(0).random_delay(), 0);
        assert!(RequestDelay::none().is_none());
    }

    #[tokio::test]
    async fn pause_waits_at_least_the_minimum() {
        let start = std::time::Instant::now();
        let waited = RequestDelay::new(20, 30).pause().await;
        assert!(waited >= 20);
        assert!(start.elapsed().as_millis() >= 20);
    }
}
