//! Security gate error types.

/// Error kinds for security gate checks.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SecurityErrorKind {
    /// Referer header absent (strict mode rejects)
    #[display("Referer header missing")]
    RefererMissing,
    /// Referer host not on the allow-list
    #[display("Referer rejected: {}", _0)]
    RefererRejected(String),
    /// Per-client rate limit exhausted
    #[display(
        "Rate limit exceeded for {}: {} requests per {} seconds, retry after {}s",
        client, limit, window_secs, retry_after_secs
    )]
    RateLimitExceeded {
        /// Client identity (IP address)
        client: String,
        /// Configured request limit
        limit: u32,
        /// Window size in seconds
        window_secs: u64,
        /// Seconds until a slot frees up
        retry_after_secs: u64,
    },
    /// Remote error log insert failed (fail-silent path, surfaced for tracing)
    #[display("Error logging failed: {}", _0)]
    LoggingFailed(String),
}

/// Security error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Security Error: {} at line {} in {}", kind, line, file)]
pub struct SecurityError {
    /// The error kind
    pub kind: SecurityErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl SecurityError {
    /// Create a new SecurityError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SecurityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
