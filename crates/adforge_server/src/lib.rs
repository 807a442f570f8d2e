//! HTTP API server for adforge.
//!
//! Routes:
//! - `POST /api/generate` — draft an ad from a listing form
//! - `POST /api/optimize` — rewrite an existing ad with SEO keywords
//! - `GET /api/credits` — balance and history for a user
//! - `GET /health` — liveness probe
//!
//! Every copy route passes the security gate (referer allow-list plus
//! per-IP rate limiting) before touching the provider, and debits the
//! credit ledger only after the provider call succeeds.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod records;
mod request;
mod response;
mod routes;
mod state;

pub use records::RecordStore;
pub use request::{CreditsQuery, GenerateBody, OptimizeBody};
pub use response::{ApiError, CreditsResponse, GenerateResponse, OptimizeResponse};
pub use routes::{create_router, serve};
pub use state::AppState;
