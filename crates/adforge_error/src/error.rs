//! Top-level error wrapper types.

use crate::{
    ConfigError, CreditError, FormError, GeminiError, SecurityError, ServerError, StateError,
};

/// This is the foundation error enum. Each adforge crate contributes a variant
/// for its own error family.
///
/// # Examples
///
/// ```
/// use adforge_error::{AdforgeError, ConfigError};
///
/// let config_err = ConfigError::new("Missing required field");
/// let err: AdforgeError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AdforgeErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini provider error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Credit ledger error
    #[from(CreditError)]
    Credit(CreditError),
    /// Security gate error
    #[from(SecurityError)]
    Security(SecurityError),
    /// Form validation error
    #[from(FormError)]
    Form(FormError),
    /// Session state error
    #[from(StateError)]
    State(StateError),
    /// HTTP API server error
    #[from(ServerError)]
    Server(ServerError),
}

/// Adforge error with kind discrimination.
///
/// # Examples
///
/// ```
/// use adforge_error::{AdforgeError, AdforgeResult, ConfigError};
///
/// fn might_fail() -> AdforgeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Adforge Error: {}", _0)]
pub struct AdforgeError(Box<AdforgeErrorKind>);

impl AdforgeError {
    /// Create a new error from a kind.
    pub fn new(kind: AdforgeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AdforgeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to AdforgeErrorKind
impl<T> From<T> for AdforgeError
where
    T: Into<AdforgeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for adforge operations.
///
/// # Examples
///
/// ```
/// use adforge_error::{AdforgeResult, ConfigError};
///
/// fn load_settings() -> AdforgeResult<String> {
///     Err(ConfigError::new("unknown provider"))?
/// }
/// ```
pub type AdforgeResult<T> = std::result::Result<T, AdforgeError>;
