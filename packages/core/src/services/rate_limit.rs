//! Pre-request delay.
//!
//! Neither judge publishes a hard rate limit, but both ask clients to be
//! gentle. Every GET waits a random 1-3 seconds first.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

#[async_trait]
pub trait RateLimiter {
    /// Block until the next request may be issued.
    async fn wait(&self);
}

/// Sleeps for a duration drawn uniformly from `[min, max)`.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn next_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

impl Default for RandomDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(3))
    }
}

#[async_trait]
impl RateLimiter for RandomDelay {
    async fn wait(&self) {
        let delay = self.next_delay();
        tracing::debug!("sleeping {:.2}s before request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

/// Limiter that never waits. For tests and local mock servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn wait(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn next_delay_stays_within_bounds() {
        let limiter = RandomDelay::default();
        for _ in 0..1000 {
            let delay = limiter.next_delay();
            assert!(delay >= Duration::from_secs(1));
            assert!(delay < Duration::from_secs(3));
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let limiter = RandomDelay::new(Duration::from_secs(2), Duration::from_secs(2));
        assert_eq!(limiter.next_delay(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_for_the_drawn_delay() {
        let limiter = RandomDelay::default();
        let start = Instant::now();

        limiter.wait().await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn no_delay_returns_immediately() {
        let start = Instant::now();
        NoDelay.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
