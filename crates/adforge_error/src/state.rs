//! Session state error types.

/// Error kinds for session state operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StateErrorKind {
    /// Saved state could not be written
    #[display("State persistence failed: {}", _0)]
    Persistence(String),
    /// Saved state could not be read or decoded
    #[display("State restore failed: {}", _0)]
    Restore(String),
    /// Client-side quota window is exhausted
    #[display("Request quota exhausted, retry in {} seconds", _0)]
    QuotaExhausted(u64),
    /// Another request is already in flight
    #[display("An operation is already in progress")]
    Busy,
    /// Optimization requested with no generated text present
    #[display("Nothing to optimize: no generated text")]
    NothingToOptimize,
}

/// Session state error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("State Error: {} at line {} in {}", kind, line, file)]
pub struct StateError {
    /// The error kind
    pub kind: StateErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl StateError {
    /// Create a new StateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
