//! Token bucket rate limiter for text analytics requests.
//!
//! The provider may or may not throttle on its side, so every request goes
//! through this gate first. One limiter is shared by all in-flight calls.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest single wait when no `max_wait` is set.
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum tokens in the bucket
    capacity: f64,
    /// Tokens added per second
    refill_per_sec: f64,
    bucket: Mutex<Bucket>,
    /// Upper bound on one wait
    max_wait: Duration,
    /// Name for logging
    name: String,
}

impl RateLimiter {
    /// `requests_per_second` sustained, bursts up to `capacity` requests.
    pub fn new(name: impl Into<String>, requests_per_second: f64, capacity: u32) -> Self {
        let capacity = capacity.max(1) as f64;
        Self {
            capacity,
            refill_per_sec: requests_per_second,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
            max_wait: DEFAULT_MAX_WAIT,
            name: name.into(),
        }
    }

    /// Pessimistic limiter: no bursting beyond a single request.
    pub fn from_rps(name: impl Into<String>, requests_per_second: f64) -> Self {
        Self::new(name, requests_per_second, 1)
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait.max(Duration::from_millis(1));
        self
    }

    /// Acquire a token, waiting until one is available.
    pub async fn acquire(&self) {
        loop {
            let wait = match self.take() {
                Ok(()) => return,
                Err(wait) => wait,
            };
            debug!(
                limiter = %self.name,
                wait_ms = wait.as_millis() as u64,
                "Rate limited, waiting for token"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Takes one token, or returns how long until one is refilled.
    fn take(&self) -> Result<(), Duration> {
        let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut bucket);
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            return Ok(());
        }
        let missing = 1.0 - bucket.tokens;
        let wait = Duration::try_from_secs_f64(missing / self.refill_per_sec)
            .unwrap_or(self.max_wait)
            .min(self.max_wait);
        Err(wait.max(Duration::from_millis(1)))
    }

    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;
    }
}

pub type SharedRateLimiter = Arc<RateLimiter>;

pub fn shared_limiter(
    name: impl Into<String>,
    requests_per_second: f64,
    max_wait: Duration,
) -> SharedRateLimiter {
    Arc::new(RateLimiter::from_rps(name, requests_per_second).with_max_wait(max_wait))
}

#[cfg(test)]
mod tests {
    use super::*;

    impl RateLimiter {
        fn try_acquire(&self) -> bool {
            self.take().is_ok()
        }

        fn available_tokens(&self) -> f64 {
            let mut bucket = self.bucket.lock().unwrap_or_else(|e| e.into_inner());
            self.refill(&mut bucket);
            bucket.tokens
        }
    }

    #[test]
    fn test_from_rps_has_single_token() {
        let limiter = RateLimiter::from_rps("test", 20.0);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_capacity_allows_burst() {
        let limiter = RateLimiter::new("test", 1.0, 3);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_refill_after_wait() {
        let limiter = RateLimiter::from_rps("test", 100.0);
        assert!(limiter.try_acquire());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_acquire_spaces_requests() {
        let limiter = RateLimiter::from_rps("test", 20.0);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }
        // first token is immediate, the next two wait 50ms each
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[test]
    fn test_available_tokens_capped() {
        let limiter = RateLimiter::new("test", 1000.0, 2);
        std::thread::sleep(Duration::from_millis(10));
        assert!(limiter.available_tokens() <= 2.0);
    }

    #[test]
    fn test_tiny_rate_waits_at_most_max_wait() {
        let limiter =
            RateLimiter::from_rps("test", 1e-20).with_max_wait(Duration::from_secs(10));
        assert!(limiter.try_acquire());
        assert_eq!(limiter.take(), Err(Duration::from_secs(10)));
    }

    #[test]
    fn test_default_max_wait_applies() {
        let limiter = RateLimiter::from_rps("test", 1e-300);
        assert!(limiter.try_acquire());
        assert_eq!(limiter.take(), Err(DEFAULT_MAX_WAIT));
    }
}
