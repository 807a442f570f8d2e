//! Adforge - AI-assisted classified ad copy
//!
//! Adforge turns structured listing forms (electronics, cars, services,
//! clothing) into ready-to-post classified ad copy through a generative
//! text provider, then optionally rewrites the result with SEO keywords.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use adforge::{AdSession, AdforgeConfig, GeminiClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdforgeConfig::load()?;
//!     let driver = Arc::new(GeminiClient::from_env(&config, None)?);
//!     let mut session = AdSession::new(driver, &config);
//!
//!     session.forms_mut().electronics.model = "iPhone 13".to_string();
//!     session.forms_mut().electronics.specs = "256GB".to_string();
//!     let ad = session.generate().await?;
//!     println!("{}", ad.ad_text);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Adforge is organized as a workspace with focused crates:
//!
//! - `adforge_core` - Listing forms, tones, categories, ad payloads
//! - `adforge_error` - Error types
//! - `adforge_prompt` - Prompt and response-schema construction
//! - `adforge_interface` - `CopyDriver` trait definition
//! - `adforge_rate_limit` - Tier limits, quota tracking, retry logic
//! - `adforge_models` - Provider implementations (Gemini)
//! - `adforge_credits` - Remote credit ledger client
//! - `adforge_security` - Referer policy, rate gate, error logging
//! - `adforge_server` - HTTP API server
//!
//! This crate (`adforge`) re-exports everything and adds the interactive
//! session controller.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod session;

pub use session::{AdSession, SessionForms, SessionState};

pub use adforge_core::*;
pub use adforge_credits::*;
pub use adforge_error::*;
pub use adforge_interface::*;
pub use adforge_models::*;
pub use adforge_prompt::{
    PHOTO_NOTE, SYSTEM_INSTRUCTION, details_block, generation_prompt, generation_schema,
    optimization_prompt, optimization_schema, tone_instruction,
};
pub use adforge_rate_limit::*;
pub use adforge_security::*;
pub use adforge_server::*;
