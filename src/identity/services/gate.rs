//! Access gate resolving request credentials into user identities.

use crate::identity::{
    domain::UserIdentity,
    ports::{CredentialError, CredentialVerifier},
};
use std::sync::Arc;
use thiserror::Error;

/// Reasons a request is refused by the gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// No credential was presented.
    #[error("no credential presented")]
    Unauthenticated,

    /// A credential was presented but failed verification.
    #[error("invalid credential: {0}")]
    InvalidCredential(#[source] CredentialError),
}

/// Stateless gate in front of every task operation.
///
/// The gate performs no store access; it only verifies the credential and
/// extracts the user identifier it carries.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<dyn CredentialVerifier>,
}

impl AccessGate {
    /// Creates a gate backed by the given verifier.
    #[must_use]
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// Resolves a required credential.
    ///
    /// A missing or blank credential yields [`AccessError::Unauthenticated`].
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Unauthenticated`] for an absent credential and
    /// [`AccessError::InvalidCredential`] when verification fails.
    pub fn resolve(&self, credential: Option<&str>) -> Result<UserIdentity, AccessError> {
        self.resolve_optional(credential)?
            .ok_or(AccessError::Unauthenticated)
    }

    /// Resolves a credential for endpoints that also serve anonymous callers.
    ///
    /// An absent credential is not an error, but a present one must verify.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::InvalidCredential`] when a presented credential
    /// fails verification.
    pub fn resolve_optional(
        &self,
        credential: Option<&str>,
    ) -> Result<Option<UserIdentity>, AccessError> {
        let Some(token) = credential.map(str::trim).filter(|token| !token.is_empty()) else {
            return Ok(None);
        };
        self.verifier
            .verify(token)
            .map(|user_id| Some(UserIdentity::new(user_id)))
            .map_err(AccessError::InvalidCredential)
    }
}
