//! Request types for ad generation and optimization.

use crate::{ListingDetails, Tone};
use serde::{Deserialize, Serialize};

/// Request to draft a new ad from a listing form.
///
/// # Examples
///
/// ```
/// use adforge_core::{AdRequest, ElectronicsData, ListingDetails, Tone};
///
/// let request = AdRequest {
///     details: ListingDetails::Electronics(ElectronicsData {
///         model: "iPhone 13".to_string(),
///         specs: "256GB".to_string(),
///         ..Default::default()
///     }),
///     tone: Tone::Polite,
///     model: None,
/// };
/// assert!(request.details.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRequest {
    /// The listing form
    pub details: ListingDetails,
    /// Requested copy tone
    pub tone: Tone,
    /// Model identifier override (provider default when None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Request to rewrite an existing ad with SEO keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// The ad text to rewrite
    pub current_text: String,
    /// The listing form the ad was generated from
    pub details: ListingDetails,
    /// Model identifier override (provider default when None)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}
