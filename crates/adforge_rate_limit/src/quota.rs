//! Client-local sliding-window quota tracking.
//!
//! The tracker is a soft cap checked before any request leaves the client,
//! so a chatty user is stopped locally instead of burning provider quota.
//! Timestamps are persisted as JSON so the window survives restarts.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use adforge_error::{AdforgeResult, StateError, StateErrorKind};
use tracing::{debug, warn};

use crate::QuotaConfig;

/// Sliding-window request counter with optional file persistence.
///
/// A slot is consumed with [`register`](QuotaTracker::register) when a
/// request attempt starts, not when it succeeds; failed attempts still
/// count against the window.
#[derive(Debug)]
pub struct QuotaTracker {
    limit: u32,
    window: Duration,
    store: Option<PathBuf>,
    timestamps: Vec<u64>,
}

impl QuotaTracker {
    /// Creates an in-memory tracker.
    pub fn new(config: QuotaConfig) -> Self {
        QuotaTracker {
            limit: config.rpm_limit,
            window: Duration::from_secs(config.window_secs),
            store: None,
            timestamps: Vec::new(),
        }
    }

    /// Creates a tracker persisted at `path`, restoring any timestamps a
    /// previous session left there.
    ///
    /// A missing or corrupt store file starts the window empty rather than
    /// failing.
    pub fn with_store(config: QuotaConfig, path: PathBuf) -> Self {
        let timestamps = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<u64>>(&raw) {
                Ok(timestamps) => timestamps,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "quota store is corrupt, resetting");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        QuotaTracker {
            limit: config.rpm_limit,
            window: Duration::from_secs(config.window_secs),
            store: Some(path),
            timestamps,
        }
    }

    /// The soft request cap for the window.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests made within the current window.
    pub fn usage(&mut self) -> u32 {
        self.prune();
        self.timestamps.len() as u32
    }

    /// Requests still available in the current window.
    pub fn remaining(&mut self) -> u32 {
        self.limit.saturating_sub(self.usage())
    }

    /// Seconds until the oldest in-window request expires, or 0 when the
    /// window has room.
    pub fn seconds_until_reset(&mut self) -> u64 {
        self.prune();
        if (self.timestamps.len() as u32) < self.limit {
            return 0;
        }
        let Some(&oldest) = self.timestamps.iter().min() else {
            return 0;
        };
        let elapsed = now_ms().saturating_sub(oldest);
        let window_ms = self.window.as_millis() as u64;
        // Round up so callers never retry a second too early.
        window_ms.saturating_sub(elapsed).div_ceil(1000)
    }

    /// Errors with [`StateErrorKind::QuotaExhausted`] when the window is
    /// full.
    pub fn check(&mut self) -> AdforgeResult<()> {
        if self.usage() >= self.limit {
            let wait = self.seconds_until_reset();
            debug!(limit = self.limit, wait_secs = wait, "quota window full");
            return Err(StateError::new(StateErrorKind::QuotaExhausted(wait)).into());
        }
        Ok(())
    }

    /// Consumes one slot, stamping the current time.
    pub fn register(&mut self) {
        self.prune();
        self.timestamps.push(now_ms());
        self.persist();
    }

    fn prune(&mut self) {
        let cutoff = now_ms().saturating_sub(self.window.as_millis() as u64);
        let before = self.timestamps.len();
        self.timestamps.retain(|&t| t > cutoff);
        if self.timestamps.len() != before {
            self.persist();
        }
    }

    fn persist(&self) {
        let Some(path) = &self.store else {
            return;
        };
        let raw = match serde_json::to_string(&self.timestamps) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize quota window");
                return;
            }
        };
        if let Err(e) = fs::write(path, raw) {
            warn!(path = %path.display(), error = %e, "failed to persist quota window");
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
