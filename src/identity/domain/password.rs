//! Password values and PBKDF2 password hashing.

use super::IdentityDomainError;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

/// Plain-text password supplied at registration or login.
///
/// The value is never printed by its `Debug` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a password value.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::EmptyPassword`] when the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(IdentityDomainError::EmptyPassword);
        }
        Ok(Self(raw))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Self-describing password hash in the form
/// `pbkdf2-sha256:<iterations>:<hex salt>:<hex hash>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wraps a previously encoded hash, checking its structure.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::MalformedPasswordHash`] when the value
    /// does not follow the encoded format.
    pub fn parse(encoded: impl Into<String>) -> Result<Self, IdentityDomainError> {
        let raw = encoded.into();
        decode(&raw)?;
        Ok(Self(raw))
    }

    /// Returns the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Decoded components of an encoded hash.
struct DecodedHash {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

fn decode(encoded: &str) -> Result<DecodedHash, IdentityDomainError> {
    let malformed = || IdentityDomainError::MalformedPasswordHash(encoded.to_owned());
    let mut parts = encoded.split(':');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(malformed());
    };
    if scheme != SCHEME {
        return Err(malformed());
    }
    let decoded = DecodedHash {
        iterations: iterations.parse().map_err(|_| malformed())?,
        salt: hex::decode(salt).map_err(|_| malformed())?,
        hash: hex::decode(hash).map_err(|_| malformed())?,
    };
    if decoded.iterations == 0 || decoded.salt.is_empty() || decoded.hash.is_empty() {
        return Err(malformed());
    }
    Ok(decoded)
}

/// PBKDF2-HMAC-SHA256 hasher with a configurable work factor.
///
/// Verification reads the iteration count from the stored hash, so raising
/// the work factor does not invalidate existing accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    /// Iteration count used when none is configured.
    pub const DEFAULT_ITERATIONS: u32 = 100_000;

    /// Creates a hasher with the given iteration count (minimum one).
    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        let effective = if iterations == 0 { 1 } else { iterations };
        Self {
            iterations: effective,
        }
    }

    /// Returns the configured iteration count.
    #[must_use]
    pub const fn iterations(self) -> u32 {
        self.iterations
    }

    /// Hashes a password with a fresh random salt.
    #[must_use]
    pub fn hash(self, password: &Password) -> PasswordHash {
        let mut salt = [0_u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt);
        let mut derived = [0_u8; HASH_LENGTH];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, self.iterations, &mut derived);
        PasswordHash(format!(
            "{SCHEME}:{}:{}:{}",
            self.iterations,
            hex::encode(salt),
            hex::encode(derived)
        ))
    }

    /// Checks a candidate password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityDomainError::MalformedPasswordHash`] when the stored
    /// hash cannot be decoded.
    pub fn verify(
        self,
        candidate: &Password,
        stored: &PasswordHash,
    ) -> Result<bool, IdentityDomainError> {
        let decoded = decode(stored.as_str())?;
        let mut derived = vec![0_u8; decoded.hash.len()];
        pbkdf2_hmac::<Sha256>(
            candidate.as_bytes(),
            &decoded.salt,
            decoded.iterations,
            &mut derived,
        );
        Ok(constant_time_eq(&derived, &decoded.hash))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ITERATIONS)
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0_u8, |diff, (lhs, rhs)| diff | (lhs ^ rhs))
        == 0
}
