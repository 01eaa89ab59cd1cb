// [libs/domain/auth/src/errors.rs]
use thiserror::Error;

/// Failures surfaced by password hashing/verification or bearer-token handling.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A supplied password did not match its stored digest.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The password hashing primitive rejected its input (malformed digest on read).
    #[error("password hashing failure: {0}")]
    HashingFailure(String),

    /// A bearer token failed to parse, had a bad signature, or was expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The token's subject did not resolve to a known user at verification time.
    #[error("token subject not found")]
    UnknownSubject,

    /// The caller lacks the staff capability required for the attempted action.
    #[error("insufficient capability")]
    Forbidden,
}
