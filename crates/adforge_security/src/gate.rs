//! The combined security gate.

use adforge_error::AdforgeResult;
use adforge_rate_limit::SecuritySettings;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

use crate::{ErrorLogger, RateGate, RefererPolicy};

/// Referer policy and rate gate in one admission check.
///
/// Cheap to clone; all clones share the same buckets.
#[derive(Debug, Clone)]
pub struct SecurityGate {
    policy: RefererPolicy,
    gate: Arc<Mutex<RateGate>>,
    logger: ErrorLogger,
}

impl SecurityGate {
    /// Builds the gate from configured settings.
    pub fn new(settings: &SecuritySettings, logger: ErrorLogger) -> Self {
        Self {
            policy: RefererPolicy::new(&settings.allowed_domains),
            gate: Arc::new(Mutex::new(RateGate::new(settings))),
            logger,
        }
    }

    /// Admits or rejects a request before it reaches a provider.
    ///
    /// Referer is checked first, then the client's bucket. Rejections are
    /// recorded in the remote error log; the decision never waits on that
    /// write succeeding.
    #[instrument(skip(self), fields(client))]
    pub async fn admit(
        &self,
        client: &str,
        referer: Option<&str>,
        endpoint: &str,
    ) -> AdforgeResult<()> {
        if let Err(e) = self.policy.check(referer) {
            self.logger
                .log(&e.to_string(), endpoint, None, Some(client))
                .await;
            return Err(e.into());
        }

        let result = {
            let mut gate = self.gate.lock().unwrap_or_else(|poisoned| {
                // A panic while holding the lock leaves valid bucket state.
                poisoned.into_inner()
            });
            gate.check(client)
        };
        if let Err(e) = result {
            self.logger
                .log(&e.to_string(), endpoint, None, Some(client))
                .await;
            return Err(e.into());
        }

        debug!("Request admitted");
        Ok(())
    }
}
