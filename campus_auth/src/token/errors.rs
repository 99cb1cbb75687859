use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TokenError {
    /// Signature mismatch, malformed token, wrong claim shape, or expiry.
    /// Deliberately coarse: callers must not learn why verification failed.
    #[error("Invalid or expired token")]
    InvalidOrExpired,

    #[error("Signing error: {0}")]
    Signing(String),
}
