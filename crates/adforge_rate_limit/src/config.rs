//! Configuration for tiers, quota, security and credit pricing.
//!
//! Settings are layered: bundled defaults, then
//! `~/.config/adforge/adforge.toml`, then `./adforge.toml`, each overriding
//! the last.

use std::collections::HashMap;
use std::path::PathBuf;

use adforge_error::{AdforgeResult, ConfigError};
use serde::{Deserialize, Serialize};

use crate::Tier;

/// Bundled default configuration, compiled into the binary.
const DEFAULT_CONFIG: &str = include_str!("../../../adforge.toml");

/// Rate limit configuration for a tier, loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierConfig {
    /// Requests per minute.
    pub rpm: Option<u32>,
    /// Requests per day.
    pub rpd: Option<u32>,
    /// Maximum concurrent requests.
    pub max_concurrent: Option<u32>,
    /// Tier name for logging.
    #[serde(default)]
    pub name: String,
    /// Per-model overrides keyed by model id.
    #[serde(default)]
    pub models: HashMap<String, ModelTierConfig>,
}

/// Model-specific overrides within a tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ModelTierConfig {
    /// Requests per minute override.
    pub rpm: Option<u32>,
    /// Requests per day override.
    pub rpd: Option<u32>,
    /// Concurrency override.
    pub max_concurrent: Option<u32>,
}

impl TierConfig {
    /// Resolves the effective limits for `model`, applying any per-model
    /// override on top of the tier defaults.
    pub fn for_model(&self, model: &str) -> TierConfig {
        let mut resolved = self.clone();
        if let Some(over) = self.models.get(model) {
            if over.rpm.is_some() {
                resolved.rpm = over.rpm;
            }
            if over.rpd.is_some() {
                resolved.rpd = over.rpd;
            }
            if over.max_concurrent.is_some() {
                resolved.max_concurrent = over.max_concurrent;
            }
        }
        resolved.models.clear();
        resolved
    }
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn max_concurrent(&self) -> Option<u32> {
        self.max_concurrent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Tier tables for one provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which tier to use when none is requested explicitly.
    pub default_tier: String,
    /// Available tiers keyed by name.
    pub tiers: HashMap<String, TierConfig>,
}

/// Client-side quota window settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Soft cap on requests within the window.
    pub rpm_limit: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        QuotaConfig {
            rpm_limit: 15,
            window_secs: 60,
        }
    }
}

/// Server-side security gate settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecuritySettings {
    /// Domains whose referers are accepted.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    /// Per-client request cap within the window.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    /// Rate window length in seconds.
    #[serde(default = "default_rate_window")]
    pub rate_window_secs: u64,
}

fn default_rate_limit() -> u32 {
    10
}

fn default_rate_window() -> u64 {
    600
}

/// Credit pricing per operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreditCosts {
    /// Cost of a fresh generation.
    pub generation_cost: f64,
    /// Cost of an SEO optimization.
    pub optimization_cost: f64,
    /// Discounted cost of a regeneration.
    pub regeneration_cost: f64,
}

impl Default for CreditCosts {
    fn default() -> Self {
        CreditCosts {
            generation_cost: 1.0,
            optimization_cost: 1.0,
            regeneration_cost: 0.5,
        }
    }
}

/// Top-level adforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdforgeConfig {
    /// Provider tier tables keyed by provider name.
    pub providers: HashMap<String, ProviderConfig>,
    /// Client quota window.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Security gate settings.
    #[serde(default)]
    pub security: SecuritySettings,
    /// Credit pricing.
    #[serde(default)]
    pub credits: CreditCosts,
}

impl AdforgeConfig {
    /// Loads configuration from the default layered sources.
    pub fn load() -> AdforgeResult<Self> {
        let mut builder = config::Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        if let Some(path) = Self::user_config_path() {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder
            .add_source(config::File::with_name("adforge").required(false))
            .add_source(config::Environment::with_prefix("ADFORGE").separator("__"));

        let settings = builder
            .build()
            .map_err(|e| ConfigError::new(format!("failed to load configuration: {e}")))?;
        settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("invalid configuration: {e}")).into())
    }

    /// Parses configuration from a TOML string, without touching the
    /// filesystem.
    pub fn from_toml(toml: &str) -> AdforgeResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::new(format!("failed to parse configuration: {e}")))?;
        settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("invalid configuration: {e}")).into())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("adforge").join("adforge.toml"))
    }

    /// Looks up the tier for `provider`, using `tier` if given or the
    /// provider's default otherwise.
    pub fn get_tier(&self, provider: &str, tier: Option<&str>) -> AdforgeResult<TierConfig> {
        let provider_config = self.providers.get(provider).ok_or_else(|| {
            ConfigError::new(format!("unknown provider in configuration: {provider}"))
        })?;
        let tier_name = tier.unwrap_or(&provider_config.default_tier);
        let mut tier_config = provider_config
            .tiers
            .get(tier_name)
            .cloned()
            .ok_or_else(|| {
                ConfigError::new(format!("unknown tier for provider {provider}: {tier_name}"))
            })?;
        if tier_config.name.is_empty() {
            tier_config.name = tier_name.to_string();
        }
        Ok(tier_config)
    }
}
