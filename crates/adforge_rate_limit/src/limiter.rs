//! Tier-aware rate limiter with retry on transient failures.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use adforge_error::RetryableError;
use governor::{DefaultDirectRateLimiter, Quota};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

use crate::Tier;

/// One calendar-day window for the requests-per-day counter.
#[derive(Debug)]
struct DayWindow {
    started: Instant,
    count: u32,
}

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

struct Inner<T> {
    tier: T,
    rpm: Option<DefaultDirectRateLimiter>,
    concurrency: Option<Arc<Semaphore>>,
    day: Mutex<DayWindow>,
    no_retry: bool,
    max_retries: Option<usize>,
    retry_backoff_ms: Option<u64>,
}

/// Enforces a [`Tier`]'s limits around an API client.
///
/// Requests per minute are governed by a token bucket, concurrency by a
/// semaphore, and requests per day by a rolling 24-hour counter. Call
/// [`acquire`](RateLimiter::acquire) before each request, or use
/// [`execute`](RateLimiter::execute) to combine acquisition with retry on
/// transient errors.
pub struct RateLimiter<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for RateLimiter<T> {
    fn clone(&self) -> Self {
        RateLimiter {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Held for the duration of one request; releases the concurrency slot on
/// drop.
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}

impl<T: Tier> RateLimiter<T> {
    /// Creates a limiter enforcing `tier`'s limits, with retry enabled.
    pub fn new(tier: T) -> Self {
        Self::new_with_retry(tier, false, None, None)
    }

    /// Creates a limiter with explicit retry behavior.
    ///
    /// `max_retries` and `retry_backoff_ms` override the error-specific
    /// strategy when set; `no_retry` disables retries entirely.
    pub fn new_with_retry(
        tier: T,
        no_retry: bool,
        max_retries: Option<usize>,
        retry_backoff_ms: Option<u64>,
    ) -> Self {
        let rpm = tier
            .rpm()
            .and_then(NonZeroU32::new)
            .map(|rpm| governor::RateLimiter::direct(Quota::per_minute(rpm)));
        let concurrency = tier
            .max_concurrent()
            .map(|n| Arc::new(Semaphore::new(n as usize)));
        RateLimiter {
            inner: Arc::new(Inner {
                tier,
                rpm,
                concurrency,
                day: Mutex::new(DayWindow {
                    started: Instant::now(),
                    count: 0,
                }),
                no_retry,
                max_retries,
                retry_backoff_ms,
            }),
        }
    }

    /// The tier this limiter enforces.
    pub fn tier(&self) -> &T {
        &self.inner.tier
    }

    /// Waits until a request slot is available, then reserves it.
    ///
    /// Blocks on the concurrency semaphore and the per-minute bucket. The
    /// daily counter is advisory: exhaustion is logged but does not block,
    /// since the provider will reject the request with a retryable 429
    /// anyway.
    pub async fn acquire(&self) -> RateLimiterGuard {
        let permit = match &self.inner.concurrency {
            // Semaphore is never closed, acquisition cannot fail.
            Some(semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };
        if let Some(rpm) = &self.inner.rpm {
            rpm.until_ready().await;
        }
        self.register_daily().await;
        RateLimiterGuard { _permit: permit }
    }

    /// Reserves a request slot without waiting, or returns `None` if any
    /// limit is currently saturated.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        let permit = match &self.inner.concurrency {
            Some(semaphore) => match Arc::clone(semaphore).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => return None,
            },
            None => None,
        };
        if let Some(rpm) = &self.inner.rpm
            && rpm.check().is_err()
        {
            return None;
        }
        if let Ok(mut day) = self.inner.day.try_lock() {
            if day.started.elapsed() >= DAY {
                day.started = Instant::now();
                day.count = 0;
            }
            if let Some(rpd) = self.inner.tier.rpd()
                && day.count >= rpd
            {
                return None;
            }
            day.count += 1;
        }
        Some(RateLimiterGuard { _permit: permit })
    }

    async fn register_daily(&self) {
        let mut day = self.inner.day.lock().await;
        if day.started.elapsed() >= DAY {
            day.started = Instant::now();
            day.count = 0;
        }
        day.count += 1;
        if let Some(rpd) = self.inner.tier.rpd()
            && day.count > rpd
        {
            warn!(
                tier = self.inner.tier.name(),
                count = day.count,
                rpd,
                "daily request limit exceeded"
            );
        }
    }

    /// Runs `op` under the limiter, retrying transient failures.
    ///
    /// The first failing attempt picks the backoff strategy from the error
    /// itself via [`RetryableError::retry_strategy_params`]. Each retry
    /// re-acquires a slot, so retries still respect the tier limits.
    pub async fn execute<R, E, F, Fut>(&self, op: F) -> Result<R, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: RetryableError + std::fmt::Display,
    {
        let first_error = {
            let _guard = self.acquire().await;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            }
        };

        if self.inner.no_retry || !first_error.is_retryable() {
            return Err(first_error);
        }

        let (mut initial_ms, mut retries, max_delay_secs) = first_error.retry_strategy_params();
        if let Some(backoff) = self.inner.retry_backoff_ms {
            initial_ms = backoff;
        }
        if let Some(max) = self.inner.max_retries {
            retries = max;
        }
        warn!(
            error = %first_error,
            initial_ms,
            retries,
            max_delay_secs,
            "transient failure, retrying with exponential backoff"
        );

        let strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(retries);

        Retry::spawn(strategy, || async {
            let _guard = self.acquire().await;
            match op().await {
                Ok(value) => Ok(value),
                Err(e) if e.is_retryable() => {
                    debug!(error = %e, "retry attempt failed");
                    Err(RetryError::transient(e))
                }
                Err(e) => Err(RetryError::permanent(e)),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct TestTier {
        rpm: Option<u32>,
        rpd: Option<u32>,
        max_concurrent: Option<u32>,
    }

    impl Tier for TestTier {
        fn rpm(&self) -> Option<u32> {
            self.rpm
        }

        fn rpd(&self) -> Option<u32> {
            self.rpd
        }

        fn max_concurrent(&self) -> Option<u32> {
            self.max_concurrent
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test error")
        }
    }

    impl RetryableError for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }

        fn retry_strategy_params(&self) -> (u64, usize, u64) {
            (1, 3, 1)
        }
    }

    #[tokio::test]
    async fn unlimited_tier_always_acquires() {
        let limiter = RateLimiter::new(TestTier {
            rpm: None,
            rpd: None,
            max_concurrent: None,
        });
        for _ in 0..100 {
            assert!(limiter.try_acquire().is_some());
        }
    }

    #[tokio::test]
    async fn concurrency_slots_are_released_on_drop() {
        let limiter = RateLimiter::new(TestTier {
            rpm: None,
            rpd: None,
            max_concurrent: Some(1),
        });
        let guard = limiter.try_acquire().unwrap();
        assert!(limiter.try_acquire().is_none());
        drop(guard);
        assert!(limiter.try_acquire().is_some());
    }

    #[tokio::test]
    async fn rpm_bucket_rejects_burst_beyond_limit() {
        let limiter = RateLimiter::new(TestTier {
            rpm: Some(2),
            rpd: None,
            max_concurrent: None,
        });
        // governor allows a burst up to the full quota, then refuses.
        let mut guards = Vec::new();
        while let Some(guard) = limiter.try_acquire() {
            guards.push(guard);
            assert!(guards.len() <= 2, "bucket should cap the burst at rpm");
        }
        assert_eq!(guards.len(), 2);
    }

    #[tokio::test]
    async fn daily_counter_blocks_try_acquire() {
        let limiter = RateLimiter::new(TestTier {
            rpm: None,
            rpd: Some(3),
            max_concurrent: None,
        });
        for _ in 0..3 {
            assert!(limiter.try_acquire().is_some());
        }
        assert!(limiter.try_acquire().is_none());
    }

    #[tokio::test]
    async fn execute_returns_first_success() {
        let limiter = RateLimiter::new(TestTier {
            rpm: None,
            rpd: None,
            max_concurrent: Some(2),
        });
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = limiter
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn execute_retries_transient_errors() {
        let limiter = RateLimiter::new(TestTier {
            rpm: None,
            rpd: None,
            max_concurrent: None,
        });
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = limiter
            .execute(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError { retryable: true })
                } else {
                    Ok(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn execute_does_not_retry_permanent_errors() {
        let limiter = RateLimiter::new(TestTier {
            rpm: None,
            rpd: None,
            max_concurrent: None,
        });
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = limiter
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError { retryable: false })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_retry_flag_stops_after_first_attempt() {
        let limiter = RateLimiter::new_with_retry(
            TestTier {
                rpm: None,
                rpd: None,
                max_concurrent: None,
            },
            true,
            None,
            None,
        );
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = limiter
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError { retryable: true })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn max_retries_override_caps_attempts() {
        let limiter = RateLimiter::new_with_retry(
            TestTier {
                rpm: None,
                rpd: None,
                max_concurrent: None,
            },
            false,
            Some(1),
            Some(1),
        );
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = limiter
            .execute(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(TestError { retryable: true })
            })
            .await;
        assert!(result.is_err());
        // First attempt plus one retry.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
