//! Rate limiting and quota governance for adforge.
//!
//! Two independent layers live here:
//!
//! - [`RateLimiter`] enforces provider-side tier limits (requests per minute,
//!   requests per day, concurrency) around the AI client, with automatic
//!   retry on transient failures.
//! - [`QuotaTracker`] is the client-local sliding-window counter: a soft
//!   requests-per-minute cap checked before any network attempt, persisted
//!   between sessions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod quota;
mod tier;
mod tiers;

pub use config::{
    AdforgeConfig, CreditCosts, ModelTierConfig, ProviderConfig, QuotaConfig, SecuritySettings,
    TierConfig,
};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use quota::QuotaTracker;
pub use tier::Tier;
pub use tiers::GeminiTier;
