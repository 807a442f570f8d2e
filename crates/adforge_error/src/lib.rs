//! Error types for the adforge workspace.
//!
//! This crate provides the foundation error types used throughout the adforge
//! ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use adforge_error::{AdforgeResult, ConfigError};
//!
//! fn load_settings() -> AdforgeResult<String> {
//!     Err(ConfigError::new("Missing required field"))?
//! }
//!
//! match load_settings() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gemini;
mod credit;
mod security;
mod form;
mod state;
mod server;
mod error;

pub use config::ConfigError;
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use credit::{CreditError, CreditErrorKind};
pub use security::{SecurityError, SecurityErrorKind};
pub use form::{FormError, FormErrorKind};
pub use state::{StateError, StateErrorKind};
pub use server::{ServerError, ServerErrorKind};
pub use error::{AdforgeError, AdforgeErrorKind, AdforgeResult};
