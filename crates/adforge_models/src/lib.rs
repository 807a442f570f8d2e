//! AI provider drivers for adforge.
//!
//! Currently one backend: the Gemini `generateContent` REST API, wrapped in
//! tier-aware rate limiting and structured-output parsing.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{DEFAULT_MODEL, GeminiClient};
