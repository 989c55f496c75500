//! Credential issuance and verification ports.
//!
//! A credential is an opaque signed token that proves a user's identity for
//! the duration of one request. The task core never inspects it; it only
//! consumes the [`UserId`] a verifier extracts.

use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Opaque signed credential handed to clients after login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps an encoded credential.
    #[must_use]
    pub const fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// Returns the encoded credential.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the credential, returning the encoded value.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Reasons a credential cannot be issued or accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The credential is structurally invalid.
    #[error("malformed credential: {0}")]
    Malformed(String),

    /// The signature does not match.
    #[error("credential signature is invalid")]
    BadSignature,

    /// The credential has expired.
    #[error("credential has expired")]
    Expired,

    /// The embedded subject is not a user identifier.
    #[error("credential subject is not a user identifier: {0}")]
    InvalidSubject(String),

    /// Signing a new credential failed.
    #[error("failed to sign credential: {0}")]
    Signing(String),
}

/// Issues credentials for authenticated users.
pub trait CredentialIssuer: Send + Sync {
    /// Issues a credential for `user_id`, valid from `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Signing`] when the credential cannot be
    /// produced.
    fn issue(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<Credential, CredentialError>;
}

/// Verifies credentials presented with requests.
pub trait CredentialVerifier: Send + Sync {
    /// Verifies a credential and returns the user identifier it carries.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] describing why the credential was
    /// rejected.
    fn verify(&self, credential: &str) -> Result<UserId, CredentialError>;
}
