//! Server-side security gate for the adforge API.
//!
//! Three checks run before any request reaches a provider:
//!
//! - [`RefererPolicy`]: strict origin allow-list; a missing or foreign
//!   `Referer` is rejected outright.
//! - [`RateGate`]: per-client token buckets, refilled continuously over the
//!   configured window.
//! - [`ErrorLogger`]: fire-and-forget remote error log. Logging failures are
//!   swallowed; security decisions never depend on the log backend being up.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error_log;
mod gate;
mod rate_gate;
mod referer;

pub use error_log::ErrorLogger;
pub use gate::SecurityGate;
pub use rate_gate::RateGate;
pub use referer::RefererPolicy;

pub use adforge_rate_limit::SecuritySettings;
