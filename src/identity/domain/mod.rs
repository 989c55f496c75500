//! Domain model for user accounts and authenticated identities.

mod error;
mod ids;
mod password;
mod user;

pub use error::IdentityDomainError;
pub use ids::{EmailAddress, UserId};
pub use password::{Password, PasswordHash, PasswordHasher};
pub use user::{PersistedUserData, User, UserIdentity};
