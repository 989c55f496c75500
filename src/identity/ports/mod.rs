//! Port contracts for account storage and credential handling.

pub mod credentials;
pub mod repository;

pub use credentials::{Credential, CredentialError, CredentialIssuer, CredentialVerifier};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
