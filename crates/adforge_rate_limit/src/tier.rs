//! The tier abstraction for provider rate limits.

/// A provider usage tier: the set of limits an API key is entitled to.
///
/// `None` means the tier does not constrain that dimension.
pub trait Tier: Send + Sync {
    /// Requests per minute limit.
    fn rpm(&self) -> Option<u32>;

    /// Requests per day limit.
    fn rpd(&self) -> Option<u32>;

    /// Maximum concurrent in-flight requests.
    fn max_concurrent(&self) -> Option<u32>;

    /// Human-readable tier name (e.g. "Free", "Pay-as-you-go").
    fn name(&self) -> &str;
}
