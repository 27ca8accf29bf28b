//! Common result and error types for the tessel toolchain.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in tessel), not a
/// problem with the routing-resource graph being processed. Corrupt-input
/// failures have their own domain error types.
pub type TesselResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in tessel, not a user input problem.
///
/// These errors should never occur during normal operation. If one does occur,
/// it means an invariant of the canonicalization pass was broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
