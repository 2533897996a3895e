//! Domain error taxonomy
//!
//! One enum for everything the core can fail with. The HTTP layer owns
//! the translation to status codes; the scheduler catches and logs
//! instead of propagating.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    /// Overlapping booking detected under the car lock.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// OTP code mismatch, already verified, or past expiry.
    /// Deliberately carries no detail about which check failed.
    #[error("Invalid or expired OTP")]
    InvalidOrExpiredOtp,

    #[error("Illegal booking transition: {from} -> {to}")]
    IllegalTransition {
        from: &'static str,
        to: &'static str,
    },

    /// Database-level failure. The enclosing transaction has been
    /// rolled back, so the whole request is safe to retry.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
