//! Credit ledger client for metered operations.
//!
//! Balances live in a remote PostgREST-style ledger exposed as stored
//! procedures. Operations are priced in fractional credits (regeneration is
//! cheaper than a fresh draft) and charged only after the provider call
//! succeeds.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ledger;
mod operation;

pub use ledger::{CreditLedger, CreditSummary, CreditTransaction};
pub use operation::Operation;
