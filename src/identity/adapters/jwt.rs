//! HS256 JSON Web Token credentials.
//!
//! Tokens carry the user identifier as `sub` plus `iat`/`exp` timestamps.
//! They travel in the `Authorization` header as-is.

use crate::identity::{
    domain::UserId,
    ports::{Credential, CredentialError, CredentialIssuer, CredentialVerifier},
};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user identifier.
    sub: String,
    /// Issued-at unix seconds.
    iat: i64,
    /// Expiration unix seconds.
    exp: i64,
}

/// Shared-secret JWT issuer and verifier.
#[derive(Clone)]
pub struct JwtCredentials {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl JwtCredentials {
    /// Creates credentials signed with `secret` that expire after `ttl`.
    #[must_use]
    pub fn new(secret: &[u8], ttl: TimeDelta) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl,
        }
    }
}

impl fmt::Debug for JwtCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCredentials")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl CredentialIssuer for JwtCredentials {
    fn issue(
        &self,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<Credential, CredentialError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| CredentialError::Signing("expiry out of range".to_owned()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(Credential::new)
            .map_err(|err| CredentialError::Signing(err.to_string()))
    }
}

impl CredentialVerifier for JwtCredentials {
    fn verify(&self, credential: &str) -> Result<UserId, CredentialError> {
        let token_data =
            decode::<Claims>(credential, &self.decoding, &self.validation).map_err(|err| {
                match err.kind() {
                    ErrorKind::ExpiredSignature => CredentialError::Expired,
                    ErrorKind::InvalidSignature => CredentialError::BadSignature,
                    _ => CredentialError::Malformed(err.to_string()),
                }
            })?;
        let subject = token_data.claims.sub;
        subject
            .parse::<UserId>()
            .map_err(|_| CredentialError::InvalidSubject(subject))
    }
}
