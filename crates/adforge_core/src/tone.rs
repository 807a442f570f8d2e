//! Ad copy tones.

use serde::{Deserialize, Serialize};

/// Requested register for the generated ad copy.
///
/// # Examples
///
/// ```
/// use adforge_core::Tone;
///
/// assert_eq!(format!("{}", Tone::Polite), "polite");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    /// Energetic, assertive, sales-focused
    Aggressive,
    /// Friendly, sincere, trustworthy
    Polite,
    /// Minimalist, strict facts
    Brief,
    /// Calm, objective, professional
    Restrained,
    /// Ultra-realistic private seller voice
    Natural,
}

impl Default for Tone {
    fn default() -> Self {
        Tone::Polite
    }
}
