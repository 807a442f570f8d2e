//! Shared state for the API routes.

use adforge_credits::CreditLedger;
use adforge_interface::Backend;
use adforge_security::SecurityGate;
use std::sync::Arc;

use crate::RecordStore;

/// Everything the route handlers need, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// The AI backend.
    pub driver: Arc<dyn Backend>,
    /// Referer policy and per-IP rate gate.
    pub gate: SecurityGate,
    /// Credit ledger; `None` runs the API unmetered.
    pub ledger: Option<CreditLedger>,
    /// Generated-ad persistence.
    pub records: RecordStore,
}

impl AppState {
    /// Assembles the state.
    pub fn new(
        driver: Arc<dyn Backend>,
        gate: SecurityGate,
        ledger: Option<CreditLedger>,
        records: RecordStore,
    ) -> Self {
        Self {
            driver,
            gate,
            ledger,
            records,
        }
    }
}
