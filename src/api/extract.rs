//! Request extractors.

use super::ApiError;
use crate::identity::{
    domain::UserIdentity,
    ports::CredentialError,
    services::{AccessError, AccessGate},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderValue, header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

/// Identity of the caller, resolved from the raw `Authorization` header.
///
/// The header carries the credential itself, without a `Bearer ` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub UserIdentity);

impl<S> FromRequestParts<S> for Authenticated
where
    Arc<AccessGate>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = Arc::<AccessGate>::from_ref(state);
        let credential = parts
            .headers
            .get(AUTHORIZATION)
            .map(HeaderValue::to_str)
            .transpose()
            .map_err(|err| {
                AccessError::InvalidCredential(CredentialError::Malformed(err.to_string()))
            })?;
        Ok(Self(gate.resolve(credential)?))
    }
}
