//! User account aggregate and the authenticated identity it yields.

use super::{EmailAddress, PasswordHash, UserId};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Sub-second digits kept on account timestamps, matching `timestamptz`.
const TIMESTAMP_PRECISION: u16 = 6;

/// Registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    password_hash: PasswordHash,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted normalized email.
    pub email: EmailAddress,
    /// Persisted password hash.
    pub password_hash: PasswordHash,
    /// Persisted registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a newly registered user, stamped at microsecond precision.
    #[must_use]
    pub fn register(email: EmailAddress, password_hash: PasswordHash, clock: &impl Clock) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash,
            created_at: clock.utc().trunc_subsecs(TIMESTAMP_PRECISION),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            password_hash: data.password_hash,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the normalized email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored password hash.
    #[must_use]
    pub const fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Identity resolved from a verified credential.
///
/// Every task operation is scoped by the user identifier carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserIdentity {
    user_id: UserId,
}

impl UserIdentity {
    /// Creates an identity for the given user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Returns the authenticated user identifier.
    #[must_use]
    pub const fn user_id(self) -> UserId {
        self.user_id
    }
}
