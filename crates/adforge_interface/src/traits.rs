//! Trait definitions for ad copy backends and their capabilities.

use crate::{HealthStatus, ModelMetadata};
use adforge_core::{AdRequest, GeneratedAd, OptimizeRequest, OptimizedAd};
use adforge_error::AdforgeResult;
use async_trait::async_trait;

/// Core trait that all ad copy backends must implement.
///
/// This provides the minimal interface for drafting and rewriting listing
/// copy. Additional capabilities are exposed through optional traits.
#[async_trait]
pub trait CopyDriver: Send + Sync {
    /// Draft a fresh ad from structured listing details.
    async fn draft(&self, req: &AdRequest) -> AdforgeResult<GeneratedAd>;

    /// Rewrite existing ad text with search keywords worked in.
    async fn optimize(&self, req: &OptimizeRequest) -> AdforgeResult<OptimizedAd>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-flash-latest").
    fn model_name(&self) -> &str;
}

/// Trait for backends that accept listing photos (multimodal vision).
pub trait Vision: CopyDriver {
    /// Maximum number of photos per request.
    fn max_images_per_request(&self) -> usize {
        1
    }

    /// Supported image formats (MIME types).
    fn supported_image_formats(&self) -> &[&'static str] {
        &["image/png", "image/jpeg", "image/webp"]
    }

    /// Maximum image size in bytes.
    fn max_image_size_bytes(&self) -> usize {
        20 * 1024 * 1024 // 20MB inline-data limit
    }
}

/// Trait for querying model metadata and capabilities.
pub trait Metadata: CopyDriver {
    /// Get comprehensive metadata about this model.
    fn metadata(&self) -> ModelMetadata;
}

/// Trait for backends that support health checks.
#[async_trait]
pub trait Health: CopyDriver {
    /// Check if the backend is available and functioning.
    async fn health(&self) -> AdforgeResult<HealthStatus>;
}

/// A fully introspectable backend: drafting plus metadata and liveness.
///
/// The HTTP server holds its driver through this trait so `/health` can
/// report the provider's own status alongside the model identity.
pub trait Backend: Metadata + Health {}

impl<T: Metadata + Health> Backend for T {}
