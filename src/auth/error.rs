//! Authentication errors.

use thiserror::Error;

/// Authentication errors.
///
/// Decode failures are swallowed into "no current user" at the
/// resolution boundary; this type exists for the codec, which does
/// need to distinguish causes.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token expired.
    #[error("token expired")]
    TokenExpired,

    /// Internal error.
    #[error("internal auth error: {0}")]
    Internal(String),
}
