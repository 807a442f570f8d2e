//! Decoding of structured model output into ad payloads.

use adforge_core::{GeneratedAd, OptimizedAd, clean_text};
use adforge_error::{GeminiError, GeminiErrorKind};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GenerationPayload {
    #[serde(rename = "adText")]
    ad_text: String,
    #[serde(rename = "smartTip", default)]
    smart_tip: String,
}

#[derive(Debug, Deserialize)]
struct OptimizationPayload {
    #[serde(rename = "rewrittenAd")]
    rewritten_ad: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Strip a markdown code fence if the model wrapped its JSON in one.
///
/// Structured output mode makes this rare, but some models still emit
/// ```` ```json ... ``` ```` around the payload.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn decode<'a, T: Deserialize<'a>>(raw: &'a str) -> Result<T, GeminiError> {
    serde_json::from_str(raw).map_err(|e| {
        GeminiError::new(GeminiErrorKind::MalformedOutput(format!(
            "{e}: {}",
            raw.chars().take(200).collect::<String>()
        )))
    })
}

/// Decode a generation response payload.
pub fn parse_generation(raw: &str) -> Result<GeneratedAd, GeminiError> {
    let payload: GenerationPayload = decode(strip_fences(raw))?;
    Ok(GeneratedAd {
        ad_text: clean_text(payload.ad_text.trim()),
        smart_tip: clean_text(payload.smart_tip.trim()),
    })
}

/// Decode an optimization response payload.
pub fn parse_optimization(raw: &str) -> Result<OptimizedAd, GeminiError> {
    let payload: OptimizationPayload = decode(strip_fences(raw))?;
    Ok(OptimizedAd {
        ad_text: clean_text(payload.rewritten_ad.trim()),
        keywords: payload.keywords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_generation_payload() {
        let ad = parse_generation(r#"{"adText": "**Продам**\\nОтличное состояние", "smartTip": "Добавьте фото."}"#)
            .unwrap();
        assert_eq!(ad.ad_text, "**Продам**\nОтличное состояние");
        assert_eq!(ad.smart_tip, "Добавьте фото.");
    }

    #[test]
    fn parses_fenced_payload() {
        let raw = "```json\n{\"adText\": \"текст\", \"smartTip\": \"совет\"}\n```";
        let ad = parse_generation(raw).unwrap();
        assert_eq!(ad.ad_text, "текст");
    }

    #[test]
    fn smart_tip_gets_the_same_newline_cleanup_as_ad_text() {
        let ad = parse_generation(
            r#"{"adText": "текст", "smartTip": "Первый совет.\\nВторой совет."}"#,
        )
        .unwrap();
        assert_eq!(ad.smart_tip, "Первый совет.\nВторой совет.");
    }

    #[test]
    fn missing_smart_tip_defaults_to_empty() {
        let ad = parse_generation(r#"{"adText": "текст"}"#).unwrap();
        assert!(ad.smart_tip.is_empty());
    }

    #[test]
    fn malformed_json_is_reported_with_context() {
        let err = parse_generation("not json at all").unwrap_err();
        assert!(matches!(err.kind, GeminiErrorKind::MalformedOutput(_)));
        assert!(err.to_string().contains("not json"));
    }

    #[test]
    fn parses_optimization_payload() {
        let ad = parse_optimization(
            r#"{"rewrittenAd": "**Продам ps5**", "keywords": ["ps5", "приставка"]}"#,
        )
        .unwrap();
        assert_eq!(ad.keywords, vec!["ps5", "приставка"]);
    }

    #[test]
    fn optimization_without_keywords_still_decodes() {
        let ad = parse_optimization(r#"{"rewrittenAd": "текст"}"#).unwrap();
        assert!(ad.keywords.is_empty());
    }
}
