//! Form validation error types.

/// Error kinds for listing form validation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum FormErrorKind {
    /// One or more required fields are empty
    #[display("Required fields missing: {}", _0.join(", "))]
    MissingFields(Vec<String>),
    /// A field value failed a format check
    #[display("Invalid value for {}: {}", field, reason)]
    InvalidValue {
        /// Field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },
    /// Photo payload was not a data URL
    #[display("Invalid photo payload: {}", _0)]
    InvalidPhoto(String),
}

/// Form validation error with location tracking.
///
/// # Examples
///
/// ```
/// use adforge_error::{FormError, FormErrorKind};
///
/// let err = FormError::new(FormErrorKind::MissingFields(vec!["model".into()]));
/// assert!(format!("{}", err).contains("model"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Form Error: {} at line {} in {}", kind, line, file)]
pub struct FormError {
    /// The error kind
    pub kind: FormErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl FormError {
    /// Create a new FormError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FormErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
