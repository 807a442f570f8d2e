//! Driver traits for adforge AI backends.
//!
//! [`CopyDriver`] is the seam between the orchestration layer and a
//! concrete provider. Capability traits ([`Vision`], [`Metadata`],
//! [`Health`]) refine what a backend can do beyond plain text drafting.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{Backend, CopyDriver, Health, Metadata, Vision};
pub use types::{HealthStatus, ModelMetadata};
