//! Gemini REST client implementing [`CopyDriver`].

use adforge_core::{AdRequest, GeneratedAd, OptimizeRequest, OptimizedAd, Photo};
use adforge_error::{AdforgeResult, GeminiError, GeminiErrorKind};
use adforge_interface::{CopyDriver, Health, HealthStatus, Metadata, ModelMetadata, Vision};
use adforge_prompt::{
    PHOTO_NOTE, SYSTEM_INSTRUCTION, generation_prompt, generation_schema, optimization_prompt,
    optimization_schema,
};
use adforge_rate_limit::{AdforgeConfig, GeminiTier, RateLimiter, TierConfig};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::payload;
use super::wire::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

/// Model used when a request does not name one.
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const GENERATION_TEMPERATURE: f32 = 0.8;
const OPTIMIZATION_TEMPERATURE: f32 = 0.7;

/// Gemini `generateContent` client with tier-aware rate limiting.
///
/// All requests go through the limiter, which retries transient provider
/// failures (429/5xx) with per-error backoff.
#[derive(Clone)]
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    limiter: RateLimiter<TierConfig>,
}

impl GeminiClient {
    /// Creates a client for `model` under `tier`'s limits.
    #[instrument(skip(api_key, tier), fields(model = %model.as_ref(), tier = %tier.name))]
    pub fn new(api_key: impl Into<String>, model: impl AsRef<str>, tier: TierConfig) -> Self {
        let model = model.as_ref().to_string();
        debug!("Creating Gemini client");
        let limiter = RateLimiter::new(tier.for_model(&model));
        Self {
            model,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            client: reqwest::Client::new(),
            limiter,
        }
    }

    /// Creates a client from `GEMINI_API_KEY` and the configured default
    /// tier. A configuration missing the gemini tier tables falls back to
    /// the built-in free tier limits.
    pub fn from_env(config: &AdforgeConfig, model: Option<&str>) -> AdforgeResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
        let tier = config.get_tier("gemini", None).unwrap_or_else(|e| {
            warn!("No usable gemini tier in configuration ({e}), using built-in free tier");
            GeminiTier::Free.into()
        });
        Ok(Self::new(api_key, model.unwrap_or(DEFAULT_MODEL), tier))
    }

    /// Points the client at a different endpoint, for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn check_photo(&self, photo: &Photo) -> Result<(), GeminiError> {
        if !self.supported_image_formats().contains(&photo.mime.as_str()) {
            return Err(GeminiError::new(GeminiErrorKind::UnsupportedPhoto(
                format!("unsupported format: {}", photo.mime),
            )));
        }
        if photo.approx_size_bytes() > self.max_image_size_bytes() {
            return Err(GeminiError::new(GeminiErrorKind::UnsupportedPhoto(
                format!(
                    "image too large: ~{} bytes (limit {})",
                    photo.approx_size_bytes(),
                    self.max_image_size_bytes()
                ),
            )));
        }
        Ok(())
    }

    /// Builds the user turn: the prompt first, then the photo when one
    /// rides along, with the photo note appended to the prompt.
    fn user_content(&self, prompt: String, photo: Option<&Photo>) -> Result<Content, GeminiError> {
        let mut parts = Vec::with_capacity(2);
        let mut prompt = prompt;
        if let Some(photo) = photo {
            self.check_photo(photo)?;
            prompt.push_str(PHOTO_NOTE);
        }
        parts.push(Part::text(prompt));
        if let Some(photo) = photo {
            parts.push(Part::inline(photo.mime.clone(), photo.data.clone()));
        }
        Ok(Content::user(parts))
    }

    #[instrument(skip(self, body), fields(model = %self.model))]
    async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Request failed: {}", e);
                GeminiError::new(GeminiErrorKind::ApiRequest(format!("Request failed: {e}")))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error: {} {}", status, message);
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response envelope: {}", e);
            GeminiError::new(GeminiErrorKind::MalformedOutput(format!(
                "response envelope: {e}"
            )))
        })
    }

    async fn generate_text(&self, body: GenerateContentRequest) -> Result<String, GeminiError> {
        let response = self.limiter.execute(|| self.generate_content(&body)).await?;
        response
            .text()
            .ok_or_else(|| GeminiError::new(GeminiErrorKind::EmptyResponse))
    }
}

#[async_trait]
impl CopyDriver for GeminiClient {
    #[instrument(skip(self, req), fields(category = %req.details.category()))]
    async fn draft(&self, req: &AdRequest) -> AdforgeResult<GeneratedAd> {
        let content = self.user_content(generation_prompt(req), req.details.photo())?;
        let body = GenerateContentRequest {
            contents: vec![content],
            system_instruction: Content::system(SYSTEM_INSTRUCTION),
            generation_config: GenerationConfig {
                temperature: GENERATION_TEMPERATURE,
                response_mime_type: "application/json".to_string(),
                response_schema: generation_schema(),
            },
        };

        let raw = self.generate_text(body).await?;
        let ad = payload::parse_generation(&raw)?;
        debug!(chars = ad.ad_text.len(), "Draft generated");
        Ok(ad)
    }

    #[instrument(skip(self, req), fields(category = %req.details.category()))]
    async fn optimize(&self, req: &OptimizeRequest) -> AdforgeResult<OptimizedAd> {
        // SEO rewrites are text-only; any stored photo stays local.
        let content = self.user_content(optimization_prompt(req), None)?;
        let body = GenerateContentRequest {
            contents: vec![content],
            system_instruction: Content::system(SYSTEM_INSTRUCTION),
            generation_config: GenerationConfig {
                temperature: OPTIMIZATION_TEMPERATURE,
                response_mime_type: "application/json".to_string(),
                response_schema: optimization_schema(),
            },
        };

        let raw = self.generate_text(body).await?;
        let ad = payload::parse_optimization(&raw)?;
        debug!(keywords = ad.keywords.len(), "Optimization complete");
        Ok(ad)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

impl Vision for GeminiClient {
    fn supported_image_formats(&self) -> &[&'static str] {
        &[
            "image/png",
            "image/jpeg",
            "image/webp",
            "image/heic",
            "image/heif",
        ]
    }

    fn max_image_size_bytes(&self) -> usize {
        20 * 1024 * 1024 // inline-data request limit
    }
}

impl Metadata for GeminiClient {
    fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            provider: "gemini",
            model: self.model.clone(),
            max_input_tokens: 1_048_576,
            max_output_tokens: 65_536,
            supports_vision: true,
            supports_json_mode: true,
        }
    }
}

#[async_trait]
impl Health for GeminiClient {
    async fn health(&self) -> AdforgeResult<HealthStatus> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                GeminiError::new(GeminiErrorKind::ApiRequest(format!(
                    "Health check failed: {e}"
                )))
            })?;

        if response.status().is_success() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy {
                message: format!("model endpoint returned {}", response.status()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adforge_core::{ElectronicsData, ListingDetails, Tone};

    fn test_tier() -> TierConfig {
        TierConfig {
            rpm: None,
            rpd: None,
            max_concurrent: None,
            name: "test".to_string(),
            models: Default::default(),
        }
    }

    fn client() -> GeminiClient {
        GeminiClient::new("test-key", DEFAULT_MODEL, test_tier())
    }

    #[test]
    fn photo_format_is_validated_before_sending() {
        let photo = Photo {
            mime: "image/tiff".to_string(),
            data: "QUJD".to_string(),
        };
        let err = client().check_photo(&photo).unwrap_err();
        assert!(matches!(err.kind, GeminiErrorKind::UnsupportedPhoto(_)));
    }

    #[test]
    fn oversized_photo_is_rejected() {
        let photo = Photo {
            mime: "image/jpeg".to_string(),
            // ~30MB decoded
            data: "A".repeat(40 * 1024 * 1024),
        };
        let err = client().check_photo(&photo).unwrap_err();
        assert!(matches!(err.kind, GeminiErrorKind::UnsupportedPhoto(_)));
    }

    #[test]
    fn photo_turn_puts_prompt_before_image() {
        let photo = Photo {
            mime: "image/jpeg".to_string(),
            data: "QUJD".to_string(),
        };
        let content = client()
            .user_content("describe this".to_string(), Some(&photo))
            .unwrap();
        let json = serde_json::to_value(&content).unwrap();
        let text = json["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("describe this"));
        assert!(text.contains("An image is provided"));
        assert!(json["parts"][1]["inlineData"].is_object());
    }

    #[test]
    fn text_only_turn_has_no_photo_note() {
        let content = client().user_content("prompt".to_string(), None).unwrap();
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["parts"][0]["text"], "prompt");
        assert_eq!(json["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn draft_body_requests_structured_output() {
        let request = AdRequest {
            details: ListingDetails::Electronics(ElectronicsData {
                model: "iPhone 13".to_string(),
                ..Default::default()
            }),
            tone: Tone::Polite,
            model: None,
        };
        let content = client()
            .user_content(generation_prompt(&request), None)
            .unwrap();
        let body = GenerateContentRequest {
            contents: vec![content],
            system_instruction: Content::system(SYSTEM_INSTRUCTION),
            generation_config: GenerationConfig {
                temperature: GENERATION_TEMPERATURE,
                response_mime_type: "application/json".to_string(),
                response_schema: generation_schema(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("copywriter"));
    }
}
