//! Generated ad payloads.

use serde::{Deserialize, Serialize};

/// A generated classified ad with its advisory tip.
///
/// # Examples
///
/// ```
/// use adforge_core::GeneratedAd;
///
/// let ad = GeneratedAd {
///     ad_text: "**Продам iPhone**".to_string(),
///     smart_tip: "Сфотографируйте серийный номер.".to_string(),
/// };
/// assert!(ad.ad_text.starts_with("**"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAd {
    /// Full ad text in Markdown (bold title, bullet lists, CTA)
    pub ad_text: String,
    /// Short photography/detail advice for the seller
    pub smart_tip: String,
}

/// A keyword-enriched rewrite of an existing ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizedAd {
    /// Rewritten ad text, original tone and Markdown preserved
    pub ad_text: String,
    /// Keywords woven into the rewrite
    pub keywords: Vec<String>,
}

impl OptimizedAd {
    /// The display form: rewritten text with a trailing search-tags line.
    pub fn tagged_text(&self) -> String {
        if self.keywords.is_empty() {
            return self.ad_text.trim().to_string();
        }
        format!(
            "{}\n\n🔍 Теги для поиска: {}",
            self.ad_text.trim(),
            self.keywords.join(", ")
        )
    }
}

/// Clean up double-escaped newlines sometimes returned by the model in JSON.
///
/// # Examples
///
/// ```
/// use adforge_core::clean_text;
///
/// assert_eq!(clean_text("line one\\nline two"), "line one\nline two");
/// ```
pub fn clean_text(text: &str) -> String {
    text.replace("\\n", "\n")
}
