//! Per-client rate limiting using token buckets.

use adforge_error::{SecurityError, SecurityErrorKind};
use adforge_rate_limit::SecuritySettings;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, instrument};

/// Token bucket for a single client.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    fn new(max_tokens: u32) -> Self {
        let now = Instant::now();
        Self {
            tokens: max_tokens as f64,
            last_refill: now,
            last_seen: now,
        }
    }

    /// Refill tokens based on elapsed time.
    fn refill(&mut self, max_tokens: u32, window_secs: u64) {
        let now = Instant::now();
        let elapsed_secs = now.duration_since(self.last_refill).as_secs_f64();
        let refill_rate = max_tokens as f64 / window_secs as f64;
        self.tokens = (self.tokens + elapsed_secs * refill_rate).min(max_tokens as f64);
        self.last_refill = now;
    }

    /// Try to consume a token, returning the wait in seconds when empty.
    fn try_consume(&mut self, max_tokens: u32, window_secs: u64) -> Result<(), u64> {
        self.refill(max_tokens, window_secs);
        self.last_seen = Instant::now();

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let refill_rate = max_tokens as f64 / window_secs as f64;
            let secs_to_wait = (1.0 - self.tokens) / refill_rate;
            Err(secs_to_wait.ceil() as u64)
        }
    }
}

/// Rate limiter tracking one token bucket per client address.
///
/// Idle buckets are evicted once they have sat unused for a full window, so
/// the map stays bounded under churning client addresses.
#[derive(Debug)]
pub struct RateGate {
    limit: u32,
    window_secs: u64,
    buckets: HashMap<String, TokenBucket>,
}

impl RateGate {
    /// Creates a gate from the configured security settings.
    pub fn new(settings: &SecuritySettings) -> Self {
        Self {
            limit: settings.rate_limit,
            window_secs: settings.rate_window_secs,
            buckets: HashMap::new(),
        }
    }

    /// Checks whether `client` may make a request, consuming a token.
    #[instrument(skip(self))]
    pub fn check(&mut self, client: &str) -> Result<(), SecurityError> {
        self.evict_idle();

        let bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(self.limit));

        match bucket.try_consume(self.limit, self.window_secs) {
            Ok(()) => {
                debug!(tokens_remaining = bucket.tokens.floor(), "Rate gate passed");
                Ok(())
            }
            Err(retry_after_secs) => {
                debug!(retry_after_secs, "Rate gate exhausted");
                Err(SecurityError::new(SecurityErrorKind::RateLimitExceeded {
                    client: client.to_string(),
                    limit: self.limit,
                    window_secs: self.window_secs,
                    retry_after_secs,
                }))
            }
        }
    }

    /// Tokens currently available to `client`.
    pub fn available_tokens(&mut self, client: &str) -> u32 {
        let limit = self.limit;
        let window = self.window_secs;
        self.buckets
            .get_mut(client)
            .map(|bucket| {
                bucket.refill(limit, window);
                bucket.tokens.floor() as u32
            })
            .unwrap_or(self.limit)
    }

    fn evict_idle(&mut self) {
        let window = std::time::Duration::from_secs(self.window_secs);
        self.buckets
            .retain(|_, bucket| bucket.last_seen.elapsed() < window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn settings(rate_limit: u32, rate_window_secs: u64) -> SecuritySettings {
        SecuritySettings {
            allowed_domains: vec![],
            rate_limit,
            rate_window_secs,
        }
    }

    #[test]
    fn allows_within_limit() {
        let mut gate = RateGate::new(&settings(2, 600));
        assert!(gate.check("1.2.3.4").is_ok());
        assert!(gate.check("1.2.3.4").is_ok());
    }

    #[test]
    fn blocks_over_limit_with_retry_hint() {
        let mut gate = RateGate::new(&settings(2, 600));
        gate.check("1.2.3.4").unwrap();
        gate.check("1.2.3.4").unwrap();
        let err = gate.check("1.2.3.4").unwrap_err();
        match err.kind {
            SecurityErrorKind::RateLimitExceeded {
                retry_after_secs, ..
            } => assert!(retry_after_secs > 0),
            other => panic!("unexpected error kind: {other}"),
        }
    }

    #[test]
    fn clients_have_independent_buckets() {
        let mut gate = RateGate::new(&settings(1, 600));
        assert!(gate.check("1.2.3.4").is_ok());
        assert!(gate.check("1.2.3.4").is_err());
        assert!(gate.check("5.6.7.8").is_ok());
    }

    #[test]
    fn tokens_refill_over_the_window() {
        let mut gate = RateGate::new(&settings(1, 1));
        assert!(gate.check("1.2.3.4").is_ok());
        assert!(gate.check("1.2.3.4").is_err());
        thread::sleep(Duration::from_millis(1100));
        assert!(gate.check("1.2.3.4").is_ok());
    }

    #[test]
    fn idle_buckets_are_evicted() {
        let mut gate = RateGate::new(&settings(1, 1));
        gate.check("1.2.3.4").unwrap();
        thread::sleep(Duration::from_millis(1100));
        gate.check("5.6.7.8").unwrap();
        assert!(!gate.buckets.contains_key("1.2.3.4"));
    }

    #[test]
    fn unknown_client_reports_full_budget() {
        let mut gate = RateGate::new(&settings(10, 600));
        assert_eq!(gate.available_tokens("1.2.3.4"), 10);
        gate.check("1.2.3.4").unwrap();
        assert_eq!(gate.available_tokens("1.2.3.4"), 9);
    }
}
