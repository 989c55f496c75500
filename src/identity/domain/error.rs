//! Error types for identity domain validation.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The email address is empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// A stored password hash could not be decoded.
    #[error("malformed password hash: {0}")]
    MalformedPasswordHash(String),
}
