//! Request bodies for the API routes.

use adforge_core::{ListingDetails, Tone};
use serde::Deserialize;

/// Body for `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateBody {
    /// The listing form.
    pub details: ListingDetails,
    /// Requested copy tone.
    #[serde(default)]
    pub tone: Tone,
    /// Authenticated user, when credits should be metered.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Whether this is a repeat draft for the same listing (discounted).
    #[serde(default)]
    pub regeneration: bool,
    /// Model identifier override.
    #[serde(default)]
    pub model: Option<String>,
}

/// Body for `POST /api/optimize`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizeBody {
    /// The ad text to rewrite.
    pub current_text: String,
    /// The listing form the ad came from.
    pub details: ListingDetails,
    /// Authenticated user, when credits should be metered.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Model identifier override.
    #[serde(default)]
    pub model: Option<String>,
}

/// Query for `GET /api/credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsQuery {
    /// The user whose balance to fetch.
    pub user_id: String,
}
