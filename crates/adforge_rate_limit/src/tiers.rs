//! Provider-specific tier implementations.

use crate::{Tier, TierConfig};

/// Gemini API usage tiers.
///
/// Based on [Gemini API pricing](https://ai.google.dev/pricing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeminiTier {
    /// Free tier: 10 RPM, 250 RPD
    Free,
    /// Pay-as-you-go: 360 RPM, no daily limit
    PayAsYouGo,
}

impl Tier for GeminiTier {
    fn rpm(&self) -> Option<u32> {
        match self {
            GeminiTier::Free => Some(10),
            GeminiTier::PayAsYouGo => Some(360), // 6 per second
        }
    }

    fn rpd(&self) -> Option<u32> {
        match self {
            GeminiTier::Free => Some(250),
            GeminiTier::PayAsYouGo => None, // No daily limit
        }
    }

    fn max_concurrent(&self) -> Option<u32> {
        match self {
            GeminiTier::Free => Some(1),
            GeminiTier::PayAsYouGo => Some(4),
        }
    }

    fn name(&self) -> &str {
        match self {
            GeminiTier::Free => "Free",
            GeminiTier::PayAsYouGo => "Pay-as-you-go",
        }
    }
}

impl From<GeminiTier> for TierConfig {
    fn from(tier: GeminiTier) -> Self {
        TierConfig {
            rpm: tier.rpm(),
            rpd: tier.rpd(),
            max_concurrent: tier.max_concurrent(),
            name: tier.name().to_string(),
            models: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_tier_converts_to_a_config_tier() {
        let config = TierConfig::from(GeminiTier::Free);
        assert_eq!(config.rpm, Some(10));
        assert_eq!(config.rpd, Some(250));
        assert_eq!(config.max_concurrent, Some(1));
        assert_eq!(config.name, "Free");
        assert!(config.models.is_empty());
    }

    #[test]
    fn free_tier_is_bounded_in_every_dimension() {
        assert_eq!(GeminiTier::Free.rpm(), Some(10));
        assert_eq!(GeminiTier::Free.rpd(), Some(250));
        assert_eq!(GeminiTier::Free.max_concurrent(), Some(1));
    }

    #[test]
    fn paid_tier_has_no_daily_cap() {
        assert_eq!(GeminiTier::PayAsYouGo.rpd(), None);
        assert_eq!(GeminiTier::PayAsYouGo.name(), "Pay-as-you-go");
    }
}
