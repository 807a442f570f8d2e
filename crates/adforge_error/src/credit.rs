//! Credit ledger error types.

/// Error kinds for credit ledger operations.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum CreditErrorKind {
    /// No authenticated user for the ledger call
    #[display("User not authenticated")]
    NotAuthenticated,
    /// Balance too low for the requested operation
    #[display("Insufficient credits: need {}, have {}", required, available)]
    InsufficientCredits {
        /// Credits required by the operation
        required: f64,
        /// Credits currently available
        available: f64,
    },
    /// Remote stored procedure returned an error payload
    #[display("Ledger RPC failed: {}", _0)]
    Rpc(String),
    /// Transport-level failure talking to the ledger
    #[display("Ledger HTTP failure: {}", _0)]
    Http(String),
    /// Ledger response could not be decoded
    #[display("Ledger response decode failure: {}", _0)]
    Decode(String),
}

/// Credit ledger error with location tracking.
///
/// # Examples
///
/// ```
/// use adforge_error::{CreditError, CreditErrorKind};
///
/// let err = CreditError::new(CreditErrorKind::InsufficientCredits {
///     required: 1.0,
///     available: 0.5,
/// });
/// assert!(format!("{}", err).contains("Insufficient credits"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Credit Error: {} at line {} in {}", kind, line, file)]
pub struct CreditError {
    /// The error kind
    pub kind: CreditErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl CreditError {
    /// Create a new CreditError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CreditErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
