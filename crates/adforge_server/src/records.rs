//! Fire-and-forget persistence of generated ads.

use adforge_core::ListingDetails;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

/// One row for the remote `generated_ads` table.
#[derive(Debug, Clone, Serialize)]
struct GeneratedAdRow {
    user_id: Option<String>,
    category: String,
    details: serde_json::Value,
    ad_text: String,
}

/// Writes generated ads to the remote store.
///
/// Inserts are best-effort and must never delay or fail a generation
/// response. Photos are stripped before the row leaves the process; the
/// store keeps form fields, not image payloads.
#[derive(Debug, Clone)]
pub struct RecordStore {
    base_url: Option<String>,
    api_key: String,
    client: reqwest::Client,
}

impl RecordStore {
    /// Creates a store posting to `{base_url}/rest/v1/generated_ads`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url: Some(base_url),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a store that drops everything.
    pub fn disabled() -> Self {
        Self {
            base_url: None,
            api_key: String::new(),
            client: reqwest::Client::new(),
        }
    }

    /// Records a generated ad in the background.
    pub fn record(&self, user_id: Option<&str>, details: &ListingDetails, ad_text: &str) {
        let Some(base_url) = self.base_url.clone() else {
            return;
        };
        let stripped = details.without_photo();
        let row = GeneratedAdRow {
            user_id: user_id.map(str::to_string),
            category: stripped.category().to_string(),
            details: serde_json::to_value(&stripped).unwrap_or_else(|_| json!({})),
            ad_text: ad_text.to_string(),
        };
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        tokio::spawn(async move {
            let result = client
                .post(format!("{base_url}/rest/v1/generated_ads"))
                .json(&row)
                .header("apikey", &api_key)
                .header("Authorization", format!("Bearer {api_key}"))
                .header("Prefer", "return=minimal")
                .send()
                .await;
            match result {
                Ok(response) if response.status().is_success() => {
                    debug!("Generated ad recorded");
                }
                Ok(response) => {
                    warn!(status = %response.status(), "Generated ad insert rejected");
                }
                Err(e) => {
                    warn!(error = %e, "Generated ad insert failed");
                }
            }
        });
    }
}
