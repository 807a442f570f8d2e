//! JSON response schemas for structured model output.

use serde_json::{Value, json};

/// Response schema for ad generation.
///
/// Requests a JSON object with `adText` and `smartTip`, both required.
pub fn generation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "adText": {
                "type": "STRING",
                "description": "The full classified ad text with title in bold, body, and CTA. Use Markdown.",
            },
            "smartTip": {
                "type": "STRING",
                "description": "A short, expert tip (10-20 words) for the seller on how to improve their listing photos or process based on the item type. Russian language.",
            },
        },
        "required": ["adText", "smartTip"],
    })
}

/// Response schema for SEO optimization.
pub fn optimization_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "rewrittenAd": {
                "type": "STRING",
                "description": "The rewritten ad text. Keep Markdown formatting.",
            },
            "keywords": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "The list of keywords used.",
            },
        },
    })
}
