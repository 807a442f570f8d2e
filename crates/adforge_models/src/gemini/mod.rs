//! Gemini backend for ad copy generation.

mod client;
mod payload;
mod wire;

pub use client::{DEFAULT_MODEL, GeminiClient};
